use crate::session::Session;
use crate::tools::{format_links, format_text_nodes};
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Open a document for editing. Any unpublished edits to the previously open
/// document are discarded.
///
/// The response lists the editable text nodes by handle and the links by
/// position, which are the addresses used by set_text and set_link.
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "open_document")]
pub struct OpenDocument {
    /// Path of the document relative to the working tree, as shown by list_documents
    path: String,
}

impl WithExamples for OpenDocument {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![
            Example {
                description: "Open the home page",
                item: Self {
                    path: "index.html".into(),
                },
            },
            Example {
                description: "Open a nested page",
                item: Self {
                    path: "pages/contact.html".into(),
                },
            },
        ])
    }
}

impl Tool for OpenDocument {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self { path } = self;
        session.load(&path)?;

        let text_nodes = format_text_nodes(&session.text_nodes()?);
        let links = format_links(&session.links()?);
        Ok(format!("Opened {path}\n\nText nodes:\n{text_nodes}\n\nLinks:\n{links}").into())
    }
}
