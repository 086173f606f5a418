//! In-memory, per-kind collection of moderated items.
//!
//! The repository is the source of truth the panels render. It accepts any
//! transition it is told about; validation (feedback, star cap) happens one
//! layer up in the moderation controller.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::{
    entities::{ContentId, ContentItem},
    types::{ContentKind, PublishState},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: ContentKind, id: ContentId },
    #[error("{expected} repository cannot hold {found} items")]
    KindMismatch {
        expected: ContentKind,
        found: ContentKind,
    },
    #[error("items cannot be moved back to {0}")]
    InvalidTransition(PublishState),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub starred: usize,
}

#[derive(Debug, Clone)]
pub struct ContentRepository {
    kind: ContentKind,
    items: Vec<ContentItem>,
}

impl ContentRepository {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Build a repository from a backend listing, keeping the first
    /// occurrence of any duplicated id and preserving order otherwise.
    pub fn from_items(kind: ContentKind, items: Vec<ContentItem>) -> Result<Self, RepoError> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut kept = Vec::with_capacity(items.len());

        for item in items {
            if item.kind() != kind {
                return Err(RepoError::KindMismatch {
                    expected: kind,
                    found: item.kind(),
                });
            }
            if !seen.insert(item.id.clone()) {
                warn!(
                    target = "application::content::from_items",
                    kind = %kind,
                    id = %item.id,
                    "dropping duplicated item from listing"
                );
                continue;
            }
            kept.push(item);
        }

        Ok(Self { kind, items: kept })
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn list(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ContentId) -> Option<&ContentItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.get(id).is_some()
    }

    pub fn set_status(
        &mut self,
        id: &ContentId,
        state: PublishState,
        feedback: Option<String>,
    ) -> Result<&ContentItem, RepoError> {
        if state == PublishState::Pending {
            return Err(RepoError::InvalidTransition(state));
        }

        let item = self.find_mut(id)?;
        item.publish_state = state;
        item.feedback = match state {
            PublishState::Rejected => feedback,
            PublishState::Approved | PublishState::Pending => None,
        };
        Ok(item)
    }

    pub fn remove(&mut self, id: &ContentId) -> Result<ContentItem, RepoError> {
        let position = self.position(id)?;
        Ok(self.items.remove(position))
    }

    pub fn set_starred(&mut self, id: &ContentId, starred: bool) -> Result<&ContentItem, RepoError> {
        if !self.kind.supports_starring() {
            return Err(RepoError::KindMismatch {
                expected: ContentKind::Achievement,
                found: self.kind,
            });
        }

        let item = self.find_mut(id)?;
        item.starred = starred;
        Ok(item)
    }

    pub fn starred_count(&self) -> usize {
        self.items.iter().filter(|item| item.starred).count()
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.items
            .iter()
            .fold(StatusCounts::default(), |mut counts, item| {
                counts.total += 1;
                match item.publish_state {
                    PublishState::Pending => counts.pending += 1,
                    PublishState::Approved => counts.approved += 1,
                    PublishState::Rejected => counts.rejected += 1,
                }
                if item.starred {
                    counts.starred += 1;
                }
                counts
            })
    }

    fn position(&self, id: &ContentId) -> Result<usize, RepoError> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| RepoError::NotFound {
                kind: self.kind,
                id: id.clone(),
            })
    }

    fn find_mut(&mut self, id: &ContentId) -> Result<&mut ContentItem, RepoError> {
        let position = self.position(id)?;
        Ok(&mut self.items[position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AchievementRecord, JobPosting, KindPayload};

    fn id(raw: &str) -> ContentId {
        ContentId::parse(raw).expect("valid id")
    }

    fn job(raw: &str) -> ContentItem {
        ContentItem::new(id(raw), KindPayload::Job(JobPosting::default()))
    }

    fn achievement(raw: &str) -> ContentItem {
        ContentItem::new(
            id(raw),
            KindPayload::Achievement(AchievementRecord::default()),
        )
    }

    fn jobs(raw: &[&str]) -> ContentRepository {
        ContentRepository::from_items(ContentKind::Job, raw.iter().map(|r| job(r)).collect())
            .expect("job repository")
    }

    #[test]
    fn duplicated_ids_keep_first_occurrence() {
        let repo = jobs(&["a", "b", "a", "c"]);
        let order: Vec<&str> = repo.list().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn listing_with_foreign_kind_is_rejected() {
        let err = ContentRepository::from_items(ContentKind::Job, vec![achievement("x")])
            .expect_err("mixed kinds");
        assert!(matches!(err, RepoError::KindMismatch { .. }));
    }

    #[test]
    fn rejection_attaches_feedback_and_approval_clears_it() {
        let mut repo = jobs(&["a"]);

        let rejected = repo
            .set_status(&id("a"), PublishState::Rejected, Some("missing deadline".into()))
            .expect("reject");
        assert_eq!(rejected.feedback.as_deref(), Some("missing deadline"));

        let approved = repo
            .set_status(&id("a"), PublishState::Approved, None)
            .expect("approve");
        assert_eq!(approved.publish_state, PublishState::Approved);
        assert!(approved.feedback.is_none());
    }

    #[test]
    fn repository_does_not_validate_feedback() {
        let mut repo = jobs(&["a"]);
        let item = repo
            .set_status(&id("a"), PublishState::Rejected, None)
            .expect("repository accepts missing feedback");
        assert_eq!(item.publish_state, PublishState::Rejected);
    }

    #[test]
    fn pending_is_not_a_valid_target() {
        let mut repo = jobs(&["a"]);
        let err = repo
            .set_status(&id("a"), PublishState::Pending, None)
            .expect_err("pending target");
        assert_eq!(err, RepoError::InvalidTransition(PublishState::Pending));
    }

    #[test]
    fn removing_absent_id_is_not_found() {
        let mut repo = jobs(&["a", "b"]);
        repo.remove(&id("a")).expect("first removal");
        let err = repo.remove(&id("a")).expect_err("second removal");
        assert!(matches!(err, RepoError::NotFound { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn starring_is_limited_to_achievements() {
        let mut repo = jobs(&["a"]);
        assert!(repo.set_starred(&id("a"), true).is_err());

        let mut achievements =
            ContentRepository::from_items(ContentKind::Achievement, vec![achievement("x")])
                .expect("achievement repository");
        achievements.set_starred(&id("x"), true).expect("star");
        assert_eq!(achievements.starred_count(), 1);
    }

    #[test]
    fn status_counts_tally_each_state() {
        let mut repo = jobs(&["a", "b", "c"]);
        repo.set_status(&id("a"), PublishState::Approved, None)
            .expect("approve");
        repo.set_status(&id("b"), PublishState::Rejected, Some("dup".into()))
            .expect("reject");

        let counts = repo.status_counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 1);
    }
}
