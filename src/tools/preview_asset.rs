use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::session::Session;
use crate::traits::{Tool, WithExamples};
use crate::types::{ContentResponse, Example};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Show a thumbnail of an image from the asset directory
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
#[serde(rename = "preview_asset")]
pub struct PreviewAsset {
    /// Path of the image relative to the working tree, as shown by list_assets
    asset_path: String,
}

impl WithExamples for PreviewAsset {
    fn examples() -> Option<Vec<Example<Self>>> {
        Some(vec![Example {
            description: "Look at a portfolio image",
            item: Self {
                asset_path: "assets/img/portfolio/regatta.jpg".into(),
            },
        }])
    }
}

impl Tool for PreviewAsset {
    fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        let Self { asset_path } = self;
        let preview = session.preview_asset(Path::new(&asset_path))?;
        Ok(ContentResponse::text(format!(
            "{}: {}x{} (original {}x{})",
            preview.path.display(),
            preview.width,
            preview.height,
            preview.original_width,
            preview.original_height
        ))
        .with_image(STANDARD.encode(&preview.png), "image/png"))
    }
}
