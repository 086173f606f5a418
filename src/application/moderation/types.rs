use std::fmt;
use std::num::NonZeroUsize;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::content::RepoError;
use crate::application::repos::ApiError;
use crate::domain::entities::ContentId;
use crate::domain::types::ContentKind;

use super::auto_approval::AutoApprovalScope;
use super::starred::DEFAULT_STARRED_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Delete,
}

impl BulkAction {
    pub fn label(self) -> &'static str {
        match self {
            BulkAction::Approve => "Bulk approve",
            BulkAction::Delete => "Bulk delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            BulkAction::Approve => "Approved",
            BulkAction::Delete => "Deleted",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("{0}")]
    Validation(String),
    #[error("{kind} `{id}` is no longer available")]
    NotFound { kind: ContentKind, id: ContentId },
    #[error("at most {limit} achievements can be starred at once")]
    Capacity { limit: usize },
    #[error("{0} cancelled")]
    Cancelled(BulkAction),
    #[error("{0} listings have not been loaded")]
    NotLoaded(ContentKind),
    #[error("{action} is not supported for {kind} listings")]
    Unsupported {
        kind: ContentKind,
        action: &'static str,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{action} failed: {failed} of {total} {noun} could not be updated", noun = bulk_noun(.kind, .total))]
    PartialBulkFailure {
        action: BulkAction,
        kind: ContentKind,
        total: usize,
        succeeded: usize,
        failed: usize,
    },
    #[error("{kind} `{id}` was rejected but its feedback was not saved: {source}")]
    FeedbackNotSaved {
        kind: ContentKind,
        id: ContentId,
        source: ApiError,
    },
}

fn bulk_noun(kind: &ContentKind, total: &usize) -> &'static str {
    kind.label(*total)
}

impl ModerationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Rejecting requires non-blank feedback for the submitter.
    pub fn missing_feedback() -> Self {
        Self::validation("feedback is required to reject an item")
    }

    /// Map an API failure for a specific item, folding 404s into `NotFound`.
    pub fn from_api(kind: ContentKind, id: &ContentId, error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound {
                kind,
                id: id.clone(),
            },
            other => Self::Api(other),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            ModerationError::Validation(_)
            | ModerationError::NotFound { .. }
            | ModerationError::Capacity { .. }
            | ModerationError::Cancelled(_)
            | ModerationError::NotLoaded(_)
            | ModerationError::Unsupported { .. } => NoticeLevel::Warning,
            ModerationError::Api(_)
            | ModerationError::PartialBulkFailure { .. }
            | ModerationError::FeedbackNotSaved { .. } => NoticeLevel::Error,
        }
    }

    pub fn notice(&self) -> Notice {
        match self.level() {
            NoticeLevel::Warning => Notice::warning(self.to_string()),
            _ => Notice::error(self.to_string()),
        }
    }
}

impl From<RepoError> for ModerationError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::KindMismatch { found, .. } => Self::Unsupported {
                kind: found,
                action: "this change",
            },
            RepoError::InvalidTransition(state) => {
                Self::Validation(format!("items cannot be moved back to {state}"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// User-facing message produced by a moderation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, text)
    }

    fn with_level(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub kind: ContentKind,
    pub applied: usize,
}

impl BulkOutcome {
    pub fn notice(&self) -> Notice {
        Notice::success(format!(
            "{} {} {}",
            self.action.past_tense(),
            self.applied,
            self.kind.label(self.applied)
        ))
    }
}

/// Request-scoped loading state for one kind's listing.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn as_ref(&self) -> LoadState<&T> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(value) => LoadState::Ready(value),
            LoadState::Failed(reason) => LoadState::Failed(reason.clone()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            LoadState::Loading | LoadState::Failed(_) => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            LoadState::Loading | LoadState::Failed(_) => None,
        }
    }
}

/// Explicit user confirmation for destructive bulk actions.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationOptions {
    pub starred_limit: NonZeroUsize,
    pub auto_approval_scope: AutoApprovalScope,
}

impl Default for ModerationOptions {
    fn default() -> Self {
        Self {
            starred_limit: DEFAULT_STARRED_LIMIT,
            auto_approval_scope: AutoApprovalScope::PerKind,
        }
    }
}
