//! Moderated content items and their kind-specific payloads.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::domain::{
    error::DomainError,
    types::{ContentKind, PublishState},
};

/// Opaque backend identifier, stable for the lifetime of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidId {
                reason: "identifier is empty",
            });
        }
        if trimmed.contains('/') {
            return Err(DomainError::InvalidId {
                reason: "identifier contains a path separator",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ContentId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    #[serde(deserialize_with = "text_or_default")]
    pub title: String,
    #[serde(deserialize_with = "text_or_default")]
    pub company: String,
    #[serde(deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub deadline: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub apply_link: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternshipPosting {
    #[serde(deserialize_with = "text_or_default")]
    pub title: String,
    #[serde(deserialize_with = "text_or_default")]
    pub company: String,
    #[serde(deserialize_with = "optional_text")]
    pub stipend: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub deadline: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub apply_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementRecord {
    #[serde(deserialize_with = "text_or_default")]
    pub title: String,
    #[serde(deserialize_with = "text_or_default")]
    pub student_name: String,
    #[serde(deserialize_with = "optional_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamNotice {
    #[serde(deserialize_with = "text_or_default")]
    pub exam_name: String,
    #[serde(deserialize_with = "text_or_default")]
    pub conducting_body: String,
    #[serde(deserialize_with = "optional_text")]
    pub exam_date: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub registration_deadline: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub link: Option<String>,
}

/// Payload fields are display-only, so any scalar is accepted as text and
/// `null`, arrays and objects read as absent.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).filter(|text| !text.trim().is_empty()))
}

/// Kind-specific fields; opaque to moderation except for display and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum KindPayload {
    Job(JobPosting),
    Internship(InternshipPosting),
    Achievement(AchievementRecord),
    Exam(ExamNotice),
}

impl KindPayload {
    pub fn kind(&self) -> ContentKind {
        match self {
            KindPayload::Job(_) => ContentKind::Job,
            KindPayload::Internship(_) => ContentKind::Internship,
            KindPayload::Achievement(_) => ContentKind::Achievement,
            KindPayload::Exam(_) => ContentKind::Exam,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            KindPayload::Job(job) => &job.title,
            KindPayload::Internship(internship) => &internship.title,
            KindPayload::Achievement(achievement) => &achievement.title,
            KindPayload::Exam(exam) => &exam.exam_name,
        }
    }

    /// Company, conducting body, or student, depending on the kind.
    pub fn organisation(&self) -> &str {
        match self {
            KindPayload::Job(job) => &job.company,
            KindPayload::Internship(internship) => &internship.company,
            KindPayload::Achievement(achievement) => &achievement.student_name,
            KindPayload::Exam(exam) => &exam.conducting_body,
        }
    }

    pub fn deadline(&self) -> Option<&str> {
        match self {
            KindPayload::Job(job) => job.deadline.as_deref(),
            KindPayload::Internship(internship) => internship.deadline.as_deref(),
            KindPayload::Achievement(achievement) => achievement.date.as_deref(),
            KindPayload::Exam(exam) => exam.registration_deadline.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub publish_state: PublishState,
    pub payload: KindPayload,
    pub feedback: Option<String>,
    pub starred: bool,
    pub submitter_name: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl ContentItem {
    pub fn new(id: ContentId, payload: KindPayload) -> Self {
        Self {
            id,
            publish_state: PublishState::Pending,
            payload,
            feedback: None,
            starred: false,
            submitter_name: None,
            updated_at: None,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.payload.kind()
    }

    pub fn title(&self) -> &str {
        self.payload.title()
    }

    /// Case-insensitive match over title, organisation and submitter.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let haystacks = [
            Some(self.payload.title()),
            Some(self.payload.organisation()),
            self.submitter_name.as_deref(),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}
