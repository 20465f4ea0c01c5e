use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Save the edits to the open document, commit every modified file of the
/// site and push the commit to the remote.
///
/// If pushing fails the commit is kept locally and calling publish again
/// retries the push without creating another commit.
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "publish")]
pub struct Publish {
    /// Commit message summarizing the change
    message: String,

    /// Optional longer description, added as the commit body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl WithExamples for Publish {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![
            Example {
                description: "Publish with a short message",
                item: Self {
                    message: "Update opening hours".into(),
                    description: None,
                },
            },
            Example {
                description: "Publish with a description",
                item: Self {
                    message: "Refresh the home page".into(),
                    description: Some("New welcome text and a link to the summer schedule".into()),
                },
            },
        ])
    }
}

impl Tool for Publish {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self {
            message,
            description,
        } = self;
        let outcome = session.publish(&message, description.as_deref().unwrap_or_default())?;
        let remote = session.config().remote();
        Ok(match outcome.commit {
            Some(oid) => format!("Published {oid} to {remote}: {}", message.trim()),
            None => format!("Nothing new to commit, pushed existing commits to {remote}"),
        }
        .into())
    }
}
