use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Change the label and target of one link of the open document
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "set_link")]
pub struct SetLink {
    /// Position of the link, as shown by list_links
    position: usize,

    /// New visible label, as plain text
    label: String,

    /// New target url
    target: String,
}

impl WithExamples for SetLink {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Point the second link at the contact page",
            item: Self {
                position: 1,
                label: "Contact".into(),
                target: "/contact.html".into(),
            },
        }])
    }
}

impl Tool for SetLink {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self {
            position,
            label,
            target,
        } = self;
        let link = session.set_link(position, &label, &target)?;
        Ok(format!(
            "Set link {}: {} ({})\nUse preview_changes to review or publish to save.",
            link.position, link.label, link.target
        )
        .into())
    }
}
