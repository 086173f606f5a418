//! Port describing the external moderation backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::{ContentKind, ReviewAction};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}: {body}")]
    Server { status: u16, body: String },
    #[error("resource not found")]
    NotFound,
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

/// The subset of the backend REST surface that moderation needs.
///
/// `scope` on the auto-approval calls is `None` when the deployment keeps a
/// single global flag instead of one per kind.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentItem>, ApiError>;

    async fn review(
        &self,
        kind: ContentKind,
        id: &ContentId,
        action: ReviewAction,
    ) -> Result<ApiMessage, ApiError>;

    async fn submit_feedback(
        &self,
        kind: ContentKind,
        id: &ContentId,
        feedback: &str,
    ) -> Result<ApiMessage, ApiError>;

    async fn delete(&self, kind: ContentKind, id: &ContentId) -> Result<ApiMessage, ApiError>;

    async fn auto_approval(&self, scope: Option<ContentKind>) -> Result<bool, ApiError>;

    async fn set_auto_approval(
        &self,
        scope: Option<ContentKind>,
        enabled: bool,
    ) -> Result<(), ApiError>;

    async fn set_starred(&self, id: &ContentId, starred: bool) -> Result<ContentItem, ApiError>;
}
