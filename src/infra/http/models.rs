//! Wire shapes of the moderation backend.
//!
//! Listings are loosely shaped: ids may be `_id`, the state field has three
//! spellings and kind payloads are either nested (`job_data`,
//! `internship_data`) or spread over the top level. Everything is folded
//! into the closed `ContentItem` union here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::warn;

use crate::application::repos::ApiError;
use crate::domain::entities::{
    AchievementRecord, ContentId, ContentItem, ExamNotice, InternshipPosting, JobPosting,
    KindPayload,
};
use crate::domain::types::{ContentKind, PublishState, ReviewAction};

#[derive(Debug, Clone, Deserialize)]
pub struct WireContentItem {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "publishState", alias = "status")]
    pub publish_state: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, alias = "isStarred")]
    pub starred: Option<bool>,
    #[serde(default, alias = "submitterName")]
    pub submitter_name: Option<String>,
    #[serde(default, alias = "updatedAt", with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub job_data: Option<Value>,
    #[serde(default)]
    pub internship_data: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl WireContentItem {
    pub fn into_item(self, kind: ContentKind) -> Result<ContentItem, ApiError> {
        let id = ContentId::parse(self.id).map_err(ApiError::decode)?;
        let publish_state = match self.publish_state.as_deref() {
            None => PublishState::Pending,
            Some(raw) => PublishState::try_from(raw).map_err(ApiError::decode)?,
        };

        let nested = match kind {
            ContentKind::Job => self.job_data,
            ContentKind::Internship => self.internship_data,
            ContentKind::Achievement | ContentKind::Exam => None,
        };
        let source = nested.unwrap_or(Value::Object(self.fields));
        let payload = decode_payload(kind, source)?;

        Ok(ContentItem {
            id,
            publish_state,
            payload,
            feedback: self.feedback.filter(|text| !text.trim().is_empty()),
            starred: kind.supports_starring() && self.starred.unwrap_or(false),
            submitter_name: self.submitter_name,
            updated_at: self.updated_at,
        })
    }
}

fn decode_payload(kind: ContentKind, source: Value) -> Result<KindPayload, ApiError> {
    let payload = match kind {
        ContentKind::Job => KindPayload::Job(
            serde_json::from_value::<JobPosting>(source).map_err(ApiError::decode)?,
        ),
        ContentKind::Internship => KindPayload::Internship(
            serde_json::from_value::<InternshipPosting>(source).map_err(ApiError::decode)?,
        ),
        ContentKind::Achievement => KindPayload::Achievement(
            serde_json::from_value::<AchievementRecord>(source).map_err(ApiError::decode)?,
        ),
        ContentKind::Exam => KindPayload::Exam(
            serde_json::from_value::<ExamNotice>(source).map_err(ApiError::decode)?,
        ),
    };
    Ok(payload)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// A listing is either a bare array or wrapped in `data` / `items`.
///
/// Items stay raw until [`ListEnvelope::into_items`] so one malformed entry
/// cannot fail the whole listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Data { data: Vec<Value> },
    Items { items: Vec<Value> },
}

impl ListEnvelope {
    /// Decode every entry, skipping the ones that cannot be represented.
    pub fn into_items(self, kind: ContentKind) -> Vec<ContentItem> {
        let raw = match self {
            ListEnvelope::Bare(items)
            | ListEnvelope::Data { data: items }
            | ListEnvelope::Items { items } => items,
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(position, value)| {
                let decoded = serde_json::from_value::<WireContentItem>(value)
                    .map_err(ApiError::decode)
                    .and_then(|wire| wire.into_item(kind));
                match decoded {
                    Ok(item) => Some(item),
                    Err(err) => {
                        warn!(
                            target = "infra::http::models",
                            kind = %kind,
                            position,
                            error = %err,
                            "skipping undecodable listing item"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemEnvelope {
    Wrapped { data: WireContentItem },
    Bare(WireContentItem),
}

impl ItemEnvelope {
    pub fn into_item(self, kind: ContentKind) -> Result<ContentItem, ApiError> {
        match self {
            ItemEnvelope::Wrapped { data } | ItemEnvelope::Bare(data) => data.into_item(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoApprovalBody {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ReviewRequest {
    pub action: ReviewAction,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest<'a> {
    pub item_id: &'a str,
    pub item_type: &'static str,
    pub feedback: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StarRequest {
    pub starred: bool,
}
