use crate::session::Session;
use crate::tools::format_text_nodes;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// List the editable text nodes of the open document as `handle: text`.
///
/// Handles are assigned when the document is opened and stay valid until
/// another document is opened.
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "list_text_nodes")]
pub struct ListTextNodes {}

impl WithExamples for ListTextNodes {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Show the text nodes of the open document",
            item: Self {},
        }])
    }
}

impl Tool for ListTextNodes {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        Ok(format_text_nodes(&session.text_nodes()?).into())
    }
}
