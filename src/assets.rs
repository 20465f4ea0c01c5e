use std::{
    fs,
    io::{self, Cursor},
    path::{Component, Path, PathBuf},
};

use image::{GenericImageView, ImageFormat};
use walkdir::WalkDir;

use crate::error::EditorError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Binary assets kept under one fixed directory of the working tree
#[derive(Debug, Clone, fieldwork::Fieldwork)]
#[fieldwork(get)]
pub struct AssetStore {
    /// Working tree root
    working_tree: PathBuf,
    /// Asset directory, relative to the working tree
    root: PathBuf,
}

/// A thumbnail that fits inside the requested bounding box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPreview {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub png: Vec<u8>,
}

impl AssetStore {
    pub fn new(working_tree: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            working_tree: working_tree.into(),
            root: root.into(),
        }
    }

    /// Move `source` into the asset root, returning its path relative to the
    /// working tree. An existing asset with the same name is overwritten.
    pub fn add(&self, source: &Path) -> Result<PathBuf, EditorError> {
        let missing = || EditorError::io(source, io::Error::from(io::ErrorKind::NotFound));
        if !source.is_file() {
            return Err(missing());
        }
        let file_name = source.file_name().ok_or_else(missing)?;
        let relative = self.root.join(file_name);
        let destination = self.working_tree.join(&relative);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| EditorError::io(parent, e))?;
        }
        move_file(source, &destination)?;

        log::info!(
            "moved {} to {}",
            source.display(),
            destination.display()
        );
        Ok(relative)
    }

    /// Delete an asset given by its path relative to the working tree
    pub fn remove(&self, asset_path: &Path) -> Result<PathBuf, EditorError> {
        let relative = self.contained(asset_path)?;
        let absolute = self.working_tree.join(&relative);
        if !absolute.is_file() {
            return Err(EditorError::NotFound(relative));
        }

        fs::remove_file(&absolute).map_err(|e| EditorError::io(&absolute, e))?;
        log::info!("deleted {}", absolute.display());
        Ok(relative)
    }

    /// Image files under the asset root, relative to the working tree, sorted
    pub fn list(&self) -> Result<Vec<PathBuf>, EditorError> {
        let root = self.working_tree.join(&self.root);
        if !root.exists() {
            return Ok(vec![]);
        }

        let mut assets = vec![];
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root).to_path_buf();
                EditorError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && is_image(entry.path()) {
                if let Ok(relative) = entry.path().strip_prefix(&self.working_tree) {
                    assets.push(relative.to_path_buf());
                }
            }
        }
        Ok(assets)
    }

    /// Decode an asset and scale it down to fit a `max_size` square
    pub fn preview(&self, asset_path: &Path, max_size: u32) -> Result<AssetPreview, EditorError> {
        let relative = self.contained(asset_path)?;
        let absolute = self.working_tree.join(&relative);
        if !absolute.is_file() {
            return Err(EditorError::NotFound(relative));
        }

        let image = image::open(&absolute).map_err(|e| EditorError::Parse {
            path: relative.clone(),
            message: e.to_string(),
        })?;
        let (original_width, original_height) = image.dimensions();
        let thumbnail = if original_width > max_size || original_height > max_size {
            image.thumbnail(max_size, max_size)
        } else {
            image
        };
        let (width, height) = thumbnail.dimensions();

        let mut png = Cursor::new(vec![]);
        thumbnail
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| EditorError::Parse {
                path: relative.clone(),
                message: e.to_string(),
            })?;

        Ok(AssetPreview {
            path: relative,
            width,
            height,
            original_width,
            original_height,
            png: png.into_inner(),
        })
    }

    /// Normalize `asset_path` and require it to lie below the asset root
    fn contained(&self, asset_path: &Path) -> Result<PathBuf, EditorError> {
        let relative = asset_path
            .strip_prefix(&self.working_tree)
            .unwrap_or(asset_path);

        let mut normalized = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                _ => return Err(EditorError::OutsideAssetRoot(asset_path.to_path_buf())),
            }
        }

        if normalized.starts_with(&self.root) && normalized != self.root {
            Ok(normalized)
        } else {
            Err(EditorError::OutsideAssetRoot(asset_path.to_path_buf()))
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Rename, falling back to copy and delete across filesystems
fn move_file(source: &Path, destination: &Path) -> Result<(), EditorError> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    fs::copy(source, destination).map_err(|e| EditorError::io(destination, e))?;
    fs::remove_file(source).map_err(|e| EditorError::io(source, e))
}
