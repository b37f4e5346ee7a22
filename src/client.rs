//! HTTP client for the template service.

use serde::Deserialize;
use tracing::debug;

use crate::error::LabelError;
use crate::store::StoredComponent;
use crate::template::{SaveResponse, TemplatePayload};

/// Talks to a running `labelkit serve` instance.
#[derive(Debug, Clone)]
pub struct TemplateClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error body of a failed request.
#[derive(Deserialize)]
struct Problem {
    detail: String,
}

impl TemplateClient {
    /// Client for the service at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, LabelError> {
        let http = reqwest::Client::builder()
            .user_agent("labelkit/0.1")
            .build()
            .map_err(|e| LabelError::Transport(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Store every component of `payload`.
    pub async fn save(&self, payload: &TemplatePayload) -> Result<SaveResponse, LabelError> {
        let resp = self.http.post(self.url("/api/templates")).json(payload).send().await?;
        let saved: SaveResponse = ensure_success(resp).await?.json().await?;
        debug!(template = %payload.template.id, count = saved.count, "template saved");
        Ok(saved)
    }

    /// Most recently stored component rows, newest first.
    pub async fn list(&self) -> Result<Vec<StoredComponent>, LabelError> {
        let resp = self.http.get(self.url("/api/templates")).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    /// PNG preview of `payload`.
    pub async fn preview(&self, payload: &TemplatePayload) -> Result<Vec<u8>, LabelError> {
        let resp = self
            .http
            .post(self.url("/api/templates/preview"))
            .json(payload)
            .send()
            .await?;
        Ok(ensure_success(resp).await?.bytes().await?.to_vec())
    }
}

/// Turn a non-2xx response into [`LabelError::Request`].
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, LabelError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Problem>(&body)
        .map(|p| p.detail)
        .unwrap_or(body);
    Err(LabelError::Request {
        status: status.as_u16(),
        detail,
    })
}
