use std::path::PathBuf;

use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Move an image file into the asset directory, then commit and push it.
/// An existing image with the same file name is replaced.
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "add_asset")]
pub struct AddAsset {
    /// Absolute path of the image to add. The file is moved, not copied.
    source_path: String,
}

impl WithExamples for AddAsset {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Add a photo from the downloads folder",
            item: Self {
                source_path: "~/Downloads/regatta.jpg".into(),
            },
        }])
    }
}

impl Tool for AddAsset {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self { source_path } = self;
        let source = PathBuf::from(&*shellexpand::tilde(&source_path));
        let added = session.add_asset(&source)?;
        Ok(format!("Added and published {}", added.display()).into())
    }
}
