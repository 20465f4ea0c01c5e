use crate::session::{summarize, Session};
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Replace the content of one text node of the open document.
///
/// The content may contain inline markup such as `<em>` or `<a href="...">`.
/// The change stays in memory until publish is called.
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "set_text")]
pub struct SetText {
    /// Handle of the text node, as shown by list_text_nodes
    handle: usize,

    /// New inner content of the node
    content: String,
}

impl WithExamples for SetText {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![
            Example {
                description: "Replace the text of a heading",
                item: Self {
                    handle: 0,
                    content: "Welcome Team".into(),
                },
            },
            Example {
                description: "Replace a paragraph with emphasized text",
                item: Self {
                    handle: 3,
                    content: "Open <strong>every</strong> Saturday".into(),
                },
            },
        ])
    }
}

impl Tool for SetText {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self { handle, content } = self;
        session.set_text(handle, &content)?;
        let current = session.text(handle)?;
        Ok(format!(
            "Set text node {handle} to: {}\nUse preview_changes to review or publish to save.",
            summarize(&current)
        )
        .into())
    }
}
