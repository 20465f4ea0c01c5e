use std::path::{Path, PathBuf};

use diffy::{DiffOptions, PatchFormatter};

use crate::{
    assets::{AssetPreview, AssetStore},
    config::Config,
    document::{self, Document},
    edit,
    error::{EditorError, PublishStage},
    index::{self, EditableNode, Link, NodeIndex},
    publish::{PublishOutcome, Repository},
};

/// The loaded document together with the handles built over it
#[derive(Debug, fieldwork::Fieldwork)]
#[fieldwork(get)]
pub struct ActiveDocument {
    document: Document,
    index: NodeIndex,
}

/// Editing session over one working tree.
///
/// At most one document is loaded at a time. Loading another document drops
/// the previous one together with any unpublished edits to it.
#[derive(Debug, fieldwork::Fieldwork)]
#[fieldwork(get)]
pub struct Session {
    config: Config,
    #[fieldwork(skip)]
    repository: Repository,
    #[fieldwork(skip)]
    assets: AssetStore,
    #[fieldwork(skip)]
    active: Option<ActiveDocument>,
    #[fieldwork(skip)]
    dirty: bool,
}

/// One row of the text node listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNodeSummary {
    pub handle: usize,
    pub text: String,
}

const SUMMARY_CHARS: usize = 50;

impl Session {
    /// Open the working tree named by `config`, cloning it first if needed
    pub fn open(config: Config) -> Result<Self, EditorError> {
        let repository = Repository::clone_if_absent(
            config.repo_url(),
            config.working_tree(),
            config.identity(),
        )?;
        let assets = AssetStore::new(config.working_tree(), config.asset_root());

        Ok(Self {
            config,
            repository,
            assets,
            active: None,
            dirty: false,
        })
    }

    pub fn list_documents(&self) -> Result<Vec<PathBuf>, EditorError> {
        document::list_documents(self.config.working_tree(), self.config.document_extension())
    }

    /// Load `path` as the active document, replacing the current one. A
    /// document that fails to parse leaves the session unchanged.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> Result<&ActiveDocument, EditorError> {
        let path = path.into();
        let document = document::load(self.config.working_tree(), &path).inspect_err(|e| {
            log::error!("load of {} failed: {e}", path.display());
        })?;

        if self.dirty {
            if let Some(previous) = &self.active {
                log::warn!(
                    "discarding unpublished edits to {}",
                    previous.document.path().display()
                );
            }
        }

        let index = NodeIndex::build(&document);
        self.dirty = false;
        Ok(self.active.insert(ActiveDocument { document, index }))
    }

    /// Whether the active document has edits that were not published yet
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn active(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    fn active_mut(&mut self) -> Result<&mut ActiveDocument, EditorError> {
        self.active.as_mut().ok_or(EditorError::NoActiveDocument)
    }

    /// Handles of the active document with their visible text, shortened
    pub fn text_nodes(&self) -> Result<Vec<TextNodeSummary>, EditorError> {
        let active = self.active.as_ref().ok_or(EditorError::NoActiveDocument)?;
        Ok(active
            .index
            .iter()
            .map(|EditableNode { handle, node, .. }| TextNodeSummary {
                handle: *handle,
                text: summarize(&active.document.text_content(*node)),
            })
            .collect())
    }

    /// Current links of the active document
    pub fn links(&self) -> Result<Vec<Link>, EditorError> {
        let active = self.active.as_ref().ok_or(EditorError::NoActiveDocument)?;
        Ok(index::list_links(&active.document))
    }

    /// Current inner markup behind a handle
    pub fn text(&self, handle: usize) -> Result<String, EditorError> {
        let active = self.active.as_ref().ok_or(EditorError::NoActiveDocument)?;
        let node = active
            .index
            .get(handle)
            .ok_or(EditorError::InvalidHandle(handle))?;
        Ok(active.document.inner_markup(node.node))
    }

    pub fn set_text(&mut self, handle: usize, new_inner_markup: &str) -> Result<(), EditorError> {
        let active = self.active_mut()?;
        edit::set_text(
            &mut active.document,
            &active.index,
            handle,
            new_inner_markup,
        )
        .inspect_err(|e| log::error!("set_text on handle {handle} failed: {e}"))?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_link(
        &mut self,
        position: usize,
        new_label: &str,
        new_target: &str,
    ) -> Result<Link, EditorError> {
        let active = self.active_mut()?;
        let link = edit::set_link(&mut active.document, position, new_label, new_target)
            .inspect_err(|e| log::error!("set_link on position {position} failed: {e}"))?;
        self.dirty = true;
        Ok(link)
    }

    /// Unified diff between the file on disk and the edited document, or
    /// `None` when they are identical
    pub fn preview_changes(&self) -> Result<Option<String>, EditorError> {
        let active = self.active.as_ref().ok_or(EditorError::NoActiveDocument)?;
        let path = active.document.path();
        let on_disk = std::fs::read_to_string(self.config.working_tree().join(path))
            .map_err(|e| EditorError::io(path, e))?;
        let edited = document::serialize(&active.document);
        if on_disk == edited {
            return Ok(None);
        }

        let mut options = DiffOptions::new();
        options.set_original_filename(format!("a/{}", path.display()));
        options.set_modified_filename(format!("b/{}", path.display()));
        let patch = options.create_patch(&on_disk, &edited);
        let formatter = PatchFormatter::new().missing_newline_message(false);
        let formatted = formatter.fmt_patch(&patch).to_string();
        Ok(Some(formatted))
    }

    /// Write and stage the edited document if it is dirty, then commit
    /// everything that changed and push it.
    ///
    /// The dirty flag is cleared only after the push succeeded. Retrying after
    /// a failed push does not create a second commit for the same content.
    pub fn publish(
        &mut self,
        message: &str,
        description: &str,
    ) -> Result<PublishOutcome, EditorError> {
        if message.trim().is_empty() {
            log::error!("publish rejected: {}", EditorError::EmptyMessage);
            return Err(EditorError::EmptyMessage);
        }

        if self.dirty {
            if let Some(active) = &self.active {
                let path = self.config.working_tree().join(active.document.path());
                std::fs::write(&path, document::serialize(&active.document)).map_err(|e| {
                    log::error!("could not write {}: {e}", path.display());
                    EditorError::publish(PublishStage::Write, e)
                })?;
                log::info!("wrote {}", path.display());
                // update_all below only sees tracked files
                self.repository.stage_path(active.document.path())?;
            }
        }

        self.repository.stage_modified()?;
        let commit = self.repository.commit(message, description)?;
        self.repository.push(self.config.remote())?;

        self.dirty = false;
        Ok(PublishOutcome { commit })
    }

    /// Move an image into the asset root, commit it and push
    pub fn add_asset(&mut self, source: &Path) -> Result<PathBuf, EditorError> {
        let added = self
            .assets
            .add(source)
            .inspect_err(|e| log::error!("adding asset {} failed: {e}", source.display()))?;
        self.commit_asset(&added, "Add image")?;
        Ok(added)
    }

    /// Delete an image from the asset root, commit the deletion and push
    pub fn remove_asset(&mut self, asset_path: &Path) -> Result<PathBuf, EditorError> {
        let removed = self
            .assets
            .remove(asset_path)
            .inspect_err(|e| log::error!("removing asset {} failed: {e}", asset_path.display()))?;
        self.commit_asset(&removed, "Delete image")?;
        Ok(removed)
    }

    pub fn list_assets(&self) -> Result<Vec<PathBuf>, EditorError> {
        self.assets.list()
    }

    pub fn preview_asset(&self, asset_path: &Path) -> Result<AssetPreview, EditorError> {
        self.assets
            .preview(asset_path, self.config.preview_size())
            .inspect_err(|e| log::error!("preview of {} failed: {e}", asset_path.display()))
    }

    fn commit_asset(&self, path: &Path, verb: &str) -> Result<(), EditorError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.repository.stage_path(path)?;
        self.repository.commit(&format!("{verb} {name}"), "")?;
        self.repository.push(self.config.remote())
    }
}

/// Trimmed and cut to the width used in listings
pub(crate) fn summarize(text: &str) -> String {
    text.trim().chars().take(SUMMARY_CHARS).collect()
}
