use std::path::Path;

use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Delete an image from the asset directory, then commit and push the deletion
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "remove_asset")]
pub struct RemoveAsset {
    /// Path of the image relative to the working tree, as shown by list_assets
    asset_path: String,
}

impl WithExamples for RemoveAsset {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Remove an outdated photo",
            item: Self {
                asset_path: "assets/img/portfolio/regatta-2019.jpg".into(),
            },
        }])
    }
}

impl Tool for RemoveAsset {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self { asset_path } = self;
        let removed = session.remove_asset(Path::new(&asset_path))?;
        Ok(format!("Deleted and published {}", removed.display()).into())
    }
}
