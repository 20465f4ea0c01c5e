use std::path::PathBuf;

use clap::Parser;

use crate::publish::Identity;

pub const DEFAULT_ASSET_ROOT: &str = "assets/img/portfolio";

/// Edit the markup of a static site checkout and publish the edits with git
#[derive(Debug, Clone, Parser, fieldwork::Fieldwork)]
#[command(version, about)]
#[fieldwork(get)]
pub struct Config {
    /// Repository to clone when the working tree does not exist yet
    #[arg(long, env = "SITE_REPO_URL")]
    #[fieldwork(skip)]
    repo_url: Option<String>,

    /// Local checkout of the site
    #[arg(long, default_value = "site")]
    working_tree: PathBuf,

    /// Directory holding image assets, relative to the working tree
    #[arg(long, default_value = DEFAULT_ASSET_ROOT)]
    asset_root: PathBuf,

    /// Remote that publishes are pushed to
    #[arg(long, default_value = "origin")]
    remote: String,

    /// File extension of editable documents
    #[arg(long, default_value = "html")]
    document_extension: String,

    /// Asset previews are scaled to fit a square of this many pixels
    #[arg(long, default_value_t = 200)]
    #[fieldwork(get(copy))]
    preview_size: u32,

    /// Commit author name used when git has no user.name configured
    #[arg(long, default_value = "Site Editor")]
    author_name: String,

    /// Commit author email used when git has no user.email configured
    #[arg(long, default_value = "site-editor@localhost")]
    author_email: String,
}

impl Config {
    /// Defaults for every setting, operating on `working_tree`
    pub fn new(working_tree: impl Into<PathBuf>) -> Self {
        Self {
            repo_url: None,
            working_tree: working_tree.into(),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            remote: "origin".into(),
            document_extension: "html".into(),
            preview_size: 200,
            author_name: "Site Editor".into(),
            author_email: "site-editor@localhost".into(),
        }
    }

    pub fn with_repo_url(mut self, repo_url: impl Into<String>) -> Self {
        self.repo_url = Some(repo_url.into());
        self
    }

    pub fn repo_url(&self) -> Option<&str> {
        self.repo_url.as_deref()
    }

    /// Expand a leading `~` in the working tree path
    pub fn expand_home(mut self) -> Self {
        let expanded = shellexpand::tilde(&self.working_tree.to_string_lossy()).into_owned();
        self.working_tree = PathBuf::from(expanded);
        self
    }

    pub fn identity(&self) -> Identity {
        Identity {
            name: self.author_name.clone(),
            email: self.author_email.clone(),
        }
    }
}
