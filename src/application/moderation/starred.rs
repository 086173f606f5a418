//! Featured ("starred") achievements and their global cap.

use std::num::NonZeroUsize;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::ContentKind;

use super::optimistic::{OptimisticCommand, OptimisticError};
use super::service::ModerationController;
use super::types::ModerationError;

pub const DEFAULT_STARRED_LIMIT: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Caps how many achievements may be starred at once. The count is taken
/// over the whole achievement repository, not the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarredCapPolicy {
    limit: NonZeroUsize,
}

impl Default for StarredCapPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STARRED_LIMIT)
    }
}

impl StarredCapPolicy {
    pub fn new(limit: NonZeroUsize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Unstarring always passes; starring fails once the cap is reached.
    pub fn check(&self, was_starred: bool, currently_starred: usize) -> Result<(), ModerationError> {
        if !was_starred && currently_starred >= self.limit.get() {
            return Err(ModerationError::Capacity {
                limit: self.limit.get(),
            });
        }
        Ok(())
    }
}

impl ModerationController {
    /// Flip the starred flag of an achievement, optimistically.
    pub async fn try_star(&mut self, id: &ContentId) -> Result<ContentItem, ModerationError> {
        let kind = ContentKind::Achievement;
        let (was_starred, currently_starred) = {
            let repo = self.repository(kind)?;
            let item = repo.get(id).ok_or_else(|| ModerationError::NotFound {
                kind,
                id: id.clone(),
            })?;
            (item.starred, repo.starred_count())
        };

        self.starred_cap.check(was_starred, currently_starred)?;

        let api = Arc::clone(&self.api);
        let command = OptimisticCommand::toggle_star(id.clone(), was_starred);
        let repo = self.repository_mut(kind)?;
        let remote = api.set_starred(id, !was_starred);

        match command.execute(repo, remote).await {
            Ok(server_item) => {
                if server_item.starred == was_starred {
                    debug!(
                        target = "application::moderation::try_star",
                        id = %id,
                        "server kept previous starred value"
                    );
                }
                let item = repo.set_starred(id, server_item.starred)?.clone();
                counter!("gradboard_moderation_actions_total", "kind" => kind.as_str(), "action" => "star", "outcome" => "ok").increment(1);
                info!(
                    target = "application::moderation::try_star",
                    id = %id,
                    starred = item.starred,
                    "achievement star updated"
                );
                Ok(item)
            }
            Err(OptimisticError::Local(err)) => Err(err.into()),
            Err(OptimisticError::Remote(err)) => {
                counter!("gradboard_star_rollbacks_total").increment(1);
                counter!("gradboard_moderation_actions_total", "kind" => kind.as_str(), "action" => "star", "outcome" => "error").increment(1);
                warn!(
                    target = "application::moderation::try_star",
                    id = %id,
                    error = %err,
                    "star update failed; local change rolled back"
                );
                Err(ModerationError::from_api(kind, id, err))
            }
        }
    }
}
