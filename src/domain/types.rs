//! Shared domain enumerations aligned with the moderation backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// The four heterogeneous listing kinds a moderator reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Job,
    Internship,
    Achievement,
    Exam,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Job,
        ContentKind::Internship,
        ContentKind::Achievement,
        ContentKind::Exam,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Job => "job",
            ContentKind::Internship => "internship",
            ContentKind::Achievement => "achievement",
            ContentKind::Exam => "exam",
        }
    }

    /// Plural path segment used by the REST backend.
    pub fn path_segment(self) -> &'static str {
        match self {
            ContentKind::Job => "jobs",
            ContentKind::Internship => "internships",
            ContentKind::Achievement => "achievements",
            ContentKind::Exam => "exams",
        }
    }

    pub fn label(self, count: usize) -> &'static str {
        match (self, count == 1) {
            (ContentKind::Job, true) => "job",
            (ContentKind::Job, false) => "jobs",
            (ContentKind::Internship, true) => "internship",
            (ContentKind::Internship, false) => "internships",
            (ContentKind::Achievement, true) => "achievement",
            (ContentKind::Achievement, false) => "achievements",
            (ContentKind::Exam, true) => "exam",
            (ContentKind::Exam, false) => "exams",
        }
    }

    pub fn supports_starring(self) -> bool {
        matches!(self, ContentKind::Achievement)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "job" | "jobs" => Ok(ContentKind::Job),
            "internship" | "internships" => Ok(ContentKind::Internship),
            "achievement" | "achievements" => Ok(ContentKind::Achievement),
            "exam" | "exams" => Ok(ContentKind::Exam),
            _ => Err(DomainError::unknown("content kind", value)),
        }
    }
}

/// Tri-state publication status. Items never return to `Pending` once decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl PublishState {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishState::Pending => "pending",
            PublishState::Approved => "approved",
            PublishState::Rejected => "rejected",
        }
    }

    pub fn is_decided(self) -> bool {
        !matches!(self, PublishState::Pending)
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PublishState {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PublishState::Pending),
            "approved" => Ok(PublishState::Approved),
            "rejected" => Ok(PublishState::Rejected),
            _ => Err(DomainError::unknown("publish state", value)),
        }
    }
}

/// Action sent to the review endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    pub fn target_state(self) -> PublishState {
        match self {
            ReviewAction::Approve => PublishState::Approved,
            ReviewAction::Reject => PublishState::Rejected,
        }
    }
}
