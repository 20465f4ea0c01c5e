use crate::session::Session;
use crate::tools::format_links;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// List the links of the open document as `position: label (target)`
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "list_links")]
pub struct ListLinks {}

impl WithExamples for ListLinks {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Show the links of the open document",
            item: Self {},
        }])
    }
}

impl Tool for ListLinks {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        Ok(format_links(&session.links()?).into())
    }
}
