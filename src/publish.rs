//! Version-control side of publishing.
//!
//! A publish is a two step saga: the commit is created locally first and
//! then pushed. A failed push leaves the local commit in place and a retry
//! only pushes, because committing an index that matches `HEAD` is skipped
//! instead of producing an empty commit.

use std::{cell::RefCell, path::Path};

use git2::{
    build::RepoBuilder, Cred, CredentialType, ErrorCode, FetchOptions, Oid,
    PushOptions, RemoteCallbacks, Repository as GitRepository, Signature,
};

use crate::error::{EditorError, PublishFailure, PublishStage};

/// Author used when the repository configuration has no identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// What a completed publish did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// The new commit, or `None` when there was nothing left to commit
    pub commit: Option<Oid>,
}

pub struct Repository {
    repository: GitRepository,
    identity: Identity,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.repository.path())
            .field("identity", &self.identity)
            .finish()
    }
}

impl Repository {
    /// Open the repository at `working_tree`, cloning `url` into it first
    /// when the directory does not exist yet.
    pub fn clone_if_absent(
        url: Option<&str>,
        working_tree: &Path,
        identity: Identity,
    ) -> Result<Self, EditorError> {
        let clone_error = |reason: PublishFailure| {
            log::error!(
                "could not prepare repository at {}: {reason}",
                working_tree.display()
            );
            EditorError::publish(PublishStage::Clone, reason)
        };

        let repository = if working_tree.exists() {
            GitRepository::open(working_tree).map_err(|e| clone_error(e.into()))?
        } else {
            let url = url.ok_or_else(|| {
                clone_error(PublishFailure::Repository(format!(
                    "{} does not exist and no repository url is configured",
                    working_tree.display()
                )))
            })?;
            log::info!("cloning {url} into {}", working_tree.display());
            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(callbacks());
            RepoBuilder::new()
                .fetch_options(fetch_options)
                .clone(url, working_tree)
                .map_err(|e| clone_error(e.into()))?
        };

        Ok(Self {
            repository,
            identity,
        })
    }

    pub fn working_tree(&self) -> Option<&Path> {
        self.repository.workdir()
    }

    /// Stage one path relative to the working tree, recording an addition or
    /// a deletion depending on whether the file still exists.
    pub fn stage_path(&self, path: &Path) -> Result<(), EditorError> {
        let stage_error = |e: git2::Error| {
            log::error!("could not stage {}: {e}", path.display());
            EditorError::publish(PublishStage::Stage, e)
        };

        let mut index = self.repository.index().map_err(stage_error)?;
        let exists = self
            .working_tree()
            .is_some_and(|working_tree| working_tree.join(path).exists());
        if exists {
            index.add_path(path).map_err(stage_error)?;
        } else {
            index.remove_path(path).map_err(stage_error)?;
        }
        index.write().map_err(stage_error)?;
        log::debug!("staged {}", path.display());
        Ok(())
    }

    /// Stage every modification or deletion of a tracked file
    pub fn stage_modified(&self) -> Result<(), EditorError> {
        let stage_error = |e: git2::Error| {
            log::error!("could not stage modified files: {e}");
            EditorError::publish(PublishStage::Stage, e)
        };

        let mut index = self.repository.index().map_err(stage_error)?;
        index
            .update_all(["*"].iter(), None)
            .map_err(stage_error)?;
        index.write().map_err(stage_error)?;
        Ok(())
    }

    /// Commit the index on top of `HEAD`. Returns `None` without committing
    /// when the index matches `HEAD`.
    pub fn commit(&self, message: &str, description: &str) -> Result<Option<Oid>, EditorError> {
        let commit_error = |e: git2::Error| {
            log::error!("could not commit {message:?}: {e}");
            EditorError::publish(PublishStage::Commit, e)
        };

        let mut index = self.repository.index().map_err(commit_error)?;
        let tree_id = index.write_tree().map_err(commit_error)?;

        let parent = match self.repository.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(commit_error)?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(commit_error(e)),
        };

        if parent.as_ref().is_some_and(|parent| parent.tree_id() == tree_id) {
            log::warn!("nothing to commit for {message:?}");
            return Ok(None);
        }

        let tree = self.repository.find_tree(tree_id).map_err(commit_error)?;
        let signature = self.signature().map_err(commit_error)?;
        let parents = parent.iter().collect::<Vec<_>>();
        let oid = self
            .repository
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &commit_message(message, description),
                &tree,
                &parents,
            )
            .map_err(commit_error)?;

        log::info!("committed {oid}: {message}");
        Ok(Some(oid))
    }

    /// Push the current branch to `remote_name`
    pub fn push(&self, remote_name: &str) -> Result<(), EditorError> {
        let push_error = |reason: PublishFailure| {
            log::error!("could not push to {remote_name}: {reason}");
            EditorError::publish(PublishStage::Push, reason)
        };

        let head = self
            .repository
            .head()
            .map_err(|e| push_error(e.into()))?;
        let branch = head
            .name()
            .filter(|name| head.is_branch() && name.starts_with("refs/heads/"))
            .ok_or_else(|| {
                push_error(PublishFailure::Repository(
                    "HEAD is not on a branch".to_string(),
                ))
            })?
            .to_string();

        let mut remote = self
            .repository
            .find_remote(remote_name)
            .map_err(|e| push_error(e.into()))?;

        let rejection = RefCell::new(None);
        let mut remote_callbacks = callbacks();
        remote_callbacks.push_update_reference(|reference, status| {
            if let Some(message) = status {
                *rejection.borrow_mut() = Some(PublishFailure::Rejected {
                    reference: reference.to_string(),
                    message: message.to_string(),
                });
            }
            Ok(())
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(remote_callbacks);

        remote
            .push(&[format!("{branch}:{branch}")], Some(&mut options))
            .map_err(|e| push_error(e.into()))?;
        drop(options);

        if let Some(rejection) = rejection.into_inner() {
            return Err(push_error(rejection));
        }

        log::info!("pushed {branch} to {remote_name}");
        Ok(())
    }

    fn signature(&self) -> Result<Signature<'static>, git2::Error> {
        self.repository
            .signature()
            .or_else(|_| Signature::now(&self.identity.name, &self.identity.email))
    }
}

/// Subject line, then the description as the body when there is one
pub fn commit_message(message: &str, description: &str) -> String {
    let message = message.trim();
    let description = description.trim();
    if description.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n\n{description}")
    }
}

/// Credentials from the ssh agent for ssh remotes, otherwise from the
/// configured git credential helper. Each kind is offered once so that a
/// rejected credential surfaces as an authentication error.
fn callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut tried = CredentialType::empty();
    callbacks.credentials(move |url, username, allowed| {
        let config = git2::Config::open_default()?;
        if allowed.contains(CredentialType::SSH_KEY) && !tried.contains(CredentialType::SSH_KEY) {
            tried |= CredentialType::SSH_KEY;
            return Cred::ssh_key_from_agent(username.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT)
            && !tried.contains(CredentialType::USER_PASS_PLAINTEXT)
        {
            tried |= CredentialType::USER_PASS_PLAINTEXT;
            return Cred::credential_helper(&config, url, username);
        }
        if allowed.contains(CredentialType::DEFAULT) && !tried.contains(CredentialType::DEFAULT) {
            tried |= CredentialType::DEFAULT;
            return Cred::default();
        }
        Err(git2::Error::new(
            ErrorCode::Auth,
            git2::ErrorClass::Callback,
            format!("no usable credentials for {url}"),
        ))
    });
    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_becomes_the_body() {
        assert_eq!(commit_message("Update hours", ""), "Update hours");
        assert_eq!(
            commit_message("Update hours", "  Summer schedule\n"),
            "Update hours\n\nSummer schedule"
        );
    }
}
