use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// List the editable documents of the site, relative to the working tree
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "list_documents")]
pub struct ListDocuments {}

impl WithExamples for ListDocuments {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "List every page of the site",
            item: Self {},
        }])
    }
}

impl Tool for ListDocuments {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let documents = session.list_documents()?;
        if documents.is_empty() {
            return Ok(format!(
                "No documents found in {}",
                session.config().working_tree().display()
            )
            .into());
        }

        Ok(documents
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
            .into())
    }
}
