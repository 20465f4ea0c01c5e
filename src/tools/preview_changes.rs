use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Show the unpublished changes to the open document as a unified diff
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "preview_changes")]
pub struct PreviewChanges {}

impl WithExamples for PreviewChanges {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Review edits before publishing",
            item: Self {},
        }])
    }
}

impl Tool for PreviewChanges {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        Ok(session
            .preview_changes()?
            .unwrap_or_else(|| "No unpublished changes.".to_string())
            .into())
    }
}
