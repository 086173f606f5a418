//! Optimistic local updates with an inverse patch for rollback.

use std::future::Future;

use thiserror::Error;
use tracing::error;

use crate::application::content::{ContentRepository, RepoError};
use crate::application::repos::ApiError;
use crate::domain::entities::ContentId;

/// A reversible change to one repository item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPatch {
    Starred { id: ContentId, starred: bool },
}

impl ItemPatch {
    fn apply(&self, repo: &mut ContentRepository) -> Result<(), RepoError> {
        match self {
            ItemPatch::Starred { id, starred } => repo.set_starred(id, *starred).map(|_| ()),
        }
    }
}

#[derive(Debug, Error)]
pub enum OptimisticError {
    #[error(transparent)]
    Local(#[from] RepoError),
    #[error(transparent)]
    Remote(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticCommand {
    forward: ItemPatch,
    inverse: ItemPatch,
}

impl OptimisticCommand {
    pub fn new(forward: ItemPatch, inverse: ItemPatch) -> Self {
        Self { forward, inverse }
    }

    pub fn toggle_star(id: ContentId, was_starred: bool) -> Self {
        Self::new(
            ItemPatch::Starred {
                id: id.clone(),
                starred: !was_starred,
            },
            ItemPatch::Starred {
                id,
                starred: was_starred,
            },
        )
    }

    /// Apply the forward patch, await `remote`, and apply the inverse patch
    /// if the remote call fails. `remote` is not polled until the local
    /// patch has been applied.
    pub async fn execute<T, F>(
        self,
        repo: &mut ContentRepository,
        remote: F,
    ) -> Result<T, OptimisticError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.forward.apply(repo)?;

        match remote.await {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Err(rollback) = self.inverse.apply(repo) {
                    error!(
                        target = "application::moderation::optimistic",
                        error = %rollback,
                        patch = ?self.inverse,
                        "failed to roll back optimistic change"
                    );
                }
                Err(OptimisticError::Remote(err))
            }
        }
    }
}
