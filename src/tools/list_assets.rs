use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// List the images under the asset directory of the site
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "list_assets")]
pub struct ListAssets {}

impl WithExamples for ListAssets {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "List the portfolio images",
            item: Self {},
        }])
    }
}

impl Tool for ListAssets {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let assets = session.list_assets()?;
        if assets.is_empty() {
            return Ok(format!(
                "No images in {}",
                session.config().asset_root().display()
            )
            .into());
        }

        Ok(assets
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
            .into())
    }
}
