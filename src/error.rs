use std::path::PathBuf;

use git2::{ErrorClass, ErrorCode};
use strum::Display;

/// Errors surfaced by the editing core
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("unable to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("no editable text node has handle {0}")]
    InvalidHandle(usize),

    #[error("link position {position} is out of range, the document has {count} links")]
    InvalidLinkPosition { position: usize, count: usize },

    #[error("no document is loaded")]
    NoActiveDocument,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not exist under the asset root", .0.display())]
    NotFound(PathBuf),

    #[error("{} is outside the asset root", .0.display())]
    OutsideAssetRoot(PathBuf),

    #[error("commit message cannot be empty")]
    EmptyMessage,

    #[error("publish failed while {stage}: {reason}")]
    Publish {
        stage: PublishStage,
        reason: PublishFailure,
    },
}

impl EditorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn publish(stage: PublishStage, reason: impl Into<PublishFailure>) -> Self {
        Self::Publish {
            stage,
            reason: reason.into(),
        }
    }
}

/// The step of the publish saga that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PublishStage {
    #[strum(serialize = "cloning the repository")]
    Clone,
    #[strum(serialize = "writing the document")]
    Write,
    #[strum(serialize = "staging changes")]
    Stage,
    #[strum(serialize = "committing")]
    Commit,
    #[strum(serialize = "pushing")]
    Push,
}

/// Why the version-control backend refused an operation
#[derive(Debug, thiserror::Error)]
pub enum PublishFailure {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("remote has diverged (non-fast-forward): {0}")]
    NonFastForward(String),

    #[error("remote rejected {reference}: {message}")]
    Rejected { reference: String, message: String },

    #[error("{0}")]
    Repository(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<git2::Error> for PublishFailure {
    fn from(error: git2::Error) -> Self {
        let message = error.message().to_string();
        match (error.code(), error.class()) {
            (ErrorCode::Auth, _) | (_, ErrorClass::Ssh) => Self::Auth(message),
            (ErrorCode::NotFastForward, _) => Self::NonFastForward(message),
            (_, ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssl) => Self::Network(message),
            _ => Self::Repository(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_git_errors() {
        let auth = git2::Error::new(ErrorCode::Auth, ErrorClass::Http, "bad credentials");
        assert!(matches!(PublishFailure::from(auth), PublishFailure::Auth(_)));

        let diverged = git2::Error::new(
            ErrorCode::NotFastForward,
            ErrorClass::Reference,
            "cannot push non-fastforwardable reference",
        );
        assert!(matches!(
            PublishFailure::from(diverged),
            PublishFailure::NonFastForward(_)
        ));

        let offline = git2::Error::new(ErrorCode::GenericError, ErrorClass::Net, "timed out");
        assert!(matches!(
            PublishFailure::from(offline),
            PublishFailure::Network(_)
        ));

        let other = git2::Error::new(ErrorCode::NotFound, ErrorClass::Reference, "no HEAD");
        assert!(matches!(
            PublishFailure::from(other),
            PublishFailure::Repository(_)
        ));
    }

    #[test]
    fn publish_error_names_the_stage() {
        let error = EditorError::publish(
            PublishStage::Push,
            PublishFailure::Network("connection refused".into()),
        );
        assert_eq!(
            error.to_string(),
            "publish failed while pushing: network error: connection refused"
        );
    }
}
