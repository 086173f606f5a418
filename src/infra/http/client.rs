use async_trait::async_trait;
use metrics::counter;
use reqwest::{
    Client, Method, StatusCode, Url,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::application::repos::{ApiError, ApiMessage, ModerationApi};
use crate::config::ApiSettings;
use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::{ContentKind, ReviewAction};
use crate::infra::error::InfraError;

use super::models::{
    AutoApprovalBody, FeedbackRequest, ItemEnvelope, ListEnvelope, ReviewRequest, StarRequest,
};

const AUTO_APPROVAL_SEGMENT: &str = "auto-approval";

/// reqwest-backed implementation of the moderation backend.
#[derive(Clone, Debug)]
pub struct HttpModerationApi {
    client: Client,
    base: Url,
    prefix: Vec<String>,
    token: Option<String>,
}

impl HttpModerationApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let base = settings
            .require_base_url()
            .map_err(|err| InfraError::configuration(err.to_string()))?
            .clone();
        if base.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "`{base}` cannot be used as an API base URL"
            )));
        }

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http(err.to_string()))?;

        let prefix = settings
            .prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            client,
            base,
            prefix,
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("gradboard/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::network("base URL cannot carry a path"))?;
            path.pop_if_empty();
            path.extend(self.prefix.iter().map(String::as_str));
            path.extend(segments.iter().copied());
        }
        Ok(url)
    }

    fn auth_header(&self) -> Result<Option<HeaderValue>, ApiError> {
        self.token
            .as_ref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|err| ApiError::network(format!("invalid bearer token: {err}")))
            })
            .transpose()
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(segments)?;
        debug!(
            target = "infra::http::client",
            method = %method,
            url = %url,
            "sending backend request"
        );

        let mut request = self.client.request(method.clone(), url);
        if let Some(header) = self.auth_header()? {
            request = request.header(AUTHORIZATION, header);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::network)?;
        let status = response.status();
        counter!(
            "gradboard_http_requests_total",
            "method" => method.to_string(),
            "status" => status_class(status)
        )
        .increment(1);

        let bytes = response.bytes().await.map_err(ApiError::network)?;
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(bytes.to_vec())
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let bytes = self.send(method, segments, body).await?;
        serde_json::from_slice(&bytes).map_err(ApiError::decode)
    }

    /// Mutating endpoints may answer with an empty body.
    async fn request_message<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<ApiMessage, ApiError> {
        let bytes = self.send(method, segments, body).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiMessage::default());
        }
        serde_json::from_slice(&bytes).map_err(ApiError::decode)
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

fn auto_approval_segments(scope: Option<ContentKind>) -> Vec<&'static str> {
    match scope {
        Some(kind) => vec![kind.path_segment(), AUTO_APPROVAL_SEGMENT],
        None => vec![AUTO_APPROVAL_SEGMENT],
    }
}

#[async_trait]
impl ModerationApi for HttpModerationApi {
    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentItem>, ApiError> {
        let envelope: ListEnvelope = self
            .request(Method::GET, &[kind.path_segment()], None::<&()>)
            .await?;
        Ok(envelope.into_items(kind))
    }

    async fn review(
        &self,
        kind: ContentKind,
        id: &ContentId,
        action: ReviewAction,
    ) -> Result<ApiMessage, ApiError> {
        self.request_message(
            Method::POST,
            &[kind.path_segment(), id.as_str(), "review"],
            Some(&ReviewRequest { action }),
        )
        .await
    }

    async fn submit_feedback(
        &self,
        kind: ContentKind,
        id: &ContentId,
        feedback: &str,
    ) -> Result<ApiMessage, ApiError> {
        let body = FeedbackRequest {
            item_id: id.as_str(),
            item_type: kind.as_str(),
            feedback,
        };
        self.request_message(Method::POST, &["feedback"], Some(&body))
            .await
    }

    async fn delete(&self, kind: ContentKind, id: &ContentId) -> Result<ApiMessage, ApiError> {
        self.request_message(
            Method::DELETE,
            &[kind.path_segment(), id.as_str()],
            None::<&()>,
        )
        .await
    }

    async fn auto_approval(&self, scope: Option<ContentKind>) -> Result<bool, ApiError> {
        let body: AutoApprovalBody = self
            .request(Method::GET, &auto_approval_segments(scope), None::<&()>)
            .await?;
        Ok(body.enabled)
    }

    async fn set_auto_approval(
        &self,
        scope: Option<ContentKind>,
        enabled: bool,
    ) -> Result<(), ApiError> {
        self.send(
            Method::PUT,
            &auto_approval_segments(scope),
            Some(&AutoApprovalBody { enabled }),
        )
        .await
        .map(|_| ())
    }

    async fn set_starred(&self, id: &ContentId, starred: bool) -> Result<ContentItem, ApiError> {
        let kind = ContentKind::Achievement;
        let envelope: ItemEnvelope = self
            .request(
                Method::PATCH,
                &[kind.path_segment(), id.as_str()],
                Some(&StarRequest { starred }),
            )
            .await?;
        envelope.into_item(kind)
    }
}
