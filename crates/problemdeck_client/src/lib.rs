//! HTTP implementation of [`CatalogGateway`] for the ProblemDeck REST API.
//!
//! Paths are resolved against the configured API base (default
//! `http://localhost:5000/api`). Collection endpoints keep their trailing
//! slash (`problems/`, `tags/`, `upload_problem/`) to match the server's
//! routing.

use async_trait::async_trait;
use problemdeck_core::constants::UPLOAD_FIELD_NAME;
use problemdeck_core::models::{
    DeleteAck, EntityId, ImageCandidate, Problem, ProblemPayload, VocabEntry,
};
use problemdeck_core::{CatalogError, CatalogGateway, Config};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// `CatalogGateway` backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

impl HttpGateway {
    /// Build a gateway for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Validation`] when the URL cannot carry API
    /// paths and [`CatalogError::Transport`] when the HTTP client fails to
    /// initialize.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url.trim()).map_err(|err| {
            CatalogError::validation(format!("Invalid server URL '{}': {}", base_url, err))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::validation(format!(
                "Server URL '{}' cannot be used as an API base",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        Self::new(&config.api_base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        api_url(&self.base_url, segments)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<reqwest::Response, CatalogError> {
        let response = request.send().await.map_err(|err| {
            tracing::debug!(action, error = %err, "request failed before a response arrived");
            map_reqwest_error(err)
        })?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(action, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => format!("failed to read error response body: {}", err),
        };
        let message = error_message_for_response(&body);
        tracing::debug!(action, status = status.as_u16(), message = ?message, "request rejected");
        Err(CatalogError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, CatalogError> {
        self.send(request, action)
            .await?
            .json::<T>()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn send_delete(&self, url: Url, action: &str) -> Result<DeleteAck, CatalogError> {
        let body = self
            .send(self.client.delete(url), action)
            .await?
            .text()
            .await
            .map_err(map_reqwest_error)?;
        parse_delete_ack(&body)
    }

    async fn rename(&self, collection: &str, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&[collection, id.as_str()])?;
        self.send_json(self.client.put(url).json(&NameBody { name }), "rename")
            .await
    }
}

/// Join `segments` onto `base`, replacing a trailing empty segment first.
///
/// An empty final segment yields a trailing slash.
pub fn api_url(base: &Url, segments: &[&str]) -> Result<Url, CatalogError> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            CatalogError::validation(format!("Server URL '{}' cannot be used as an API base", base))
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Extract the server-provided message from an error body.
///
/// # Returns
/// The non-blank JSON `error` field, or `None` for any other body (blank,
/// HTML error pages, plain text, JSON without `error`) so the caller's
/// per-action fallback is shown instead.
pub fn error_message_for_response(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn parse_delete_ack(body: &str) -> Result<DeleteAck, CatalogError> {
    if body.trim().is_empty() {
        return Ok(DeleteAck::default());
    }
    serde_json::from_str(body).map_err(|err| CatalogError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> CatalogError {
    if err.is_decode() {
        CatalogError::Decode(err.to_string())
    } else {
        CatalogError::Transport(err.to_string())
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn list_problems(&self) -> Result<Vec<Problem>, CatalogError> {
        let url = self.endpoint(&["problems", ""])?;
        self.send_json(self.client.get(url), "list problems").await
    }

    async fn get_problem(&self, id: EntityId) -> Result<Problem, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&["problems", id.as_str()])?;
        self.send_json(self.client.get(url), "get problem").await
    }

    async fn create_problem(&self, payload: &ProblemPayload) -> Result<Problem, CatalogError> {
        let url = self.endpoint(&["problems", ""])?;
        self.send_json(self.client.post(url).json(payload), "create problem")
            .await
    }

    async fn update_problem(&self, id: EntityId, payload: &ProblemPayload) -> Result<Problem, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&["problems", id.as_str()])?;
        self.send_json(self.client.put(url).json(payload), "update problem")
            .await
    }

    async fn delete_problem(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&["problems", id.as_str()])?;
        self.send_delete(url, "delete problem").await
    }

    async fn list_tags(&self) -> Result<Vec<VocabEntry>, CatalogError> {
        let url = self.endpoint(&["tags", ""])?;
        self.send_json(self.client.get(url), "list tags").await
    }

    async fn create_tag(&self, name: &str) -> Result<VocabEntry, CatalogError> {
        let url = self.endpoint(&["tags", ""])?;
        self.send_json(self.client.post(url).json(&NameBody { name }), "create tag")
            .await
    }

    async fn update_tag(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError> {
        self.rename("tags", id, name).await
    }

    async fn delete_tag(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&["tags", id.as_str()])?;
        self.send_delete(url, "delete tag").await
    }

    async fn list_sources(&self) -> Result<Vec<VocabEntry>, CatalogError> {
        let url = self.endpoint(&["sources", ""])?;
        self.send_json(self.client.get(url), "list sources").await
    }

    async fn create_source(&self, name: &str) -> Result<VocabEntry, CatalogError> {
        let url = self.endpoint(&["sources", ""])?;
        self.send_json(self.client.post(url).json(&NameBody { name }), "create source")
            .await
    }

    async fn update_source(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError> {
        self.rename("sources", id, name).await
    }

    async fn delete_source(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let id = id.to_string();
        let url = self.endpoint(&["sources", id.as_str()])?;
        self.send_delete(url, "delete source").await
    }

    async fn submit_image(&self, image: &ImageCandidate) -> Result<Problem, CatalogError> {
        let url = self.endpoint(&["upload_problem", ""])?;
        let content = image.read_content()?;
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|err| {
                CatalogError::validation(format!("Invalid MIME type '{}': {}", image.mime_type(), err))
            })?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, part);
        tracing::info!(file = %image.file_name(), size = image.size(), "submitting image for extraction");
        self.send_json(self.client.post(url).multipart(form), "upload image")
            .await
    }
}
