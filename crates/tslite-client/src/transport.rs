//! Transport - the HTTP capability consumed by the orchestrator
//!
//! The orchestrator owns timeouts and fallback; a transport performs exactly
//! one POST and reports what came back.

use crate::error::{Error, Result};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Raw response of a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase ("Not Found"), may be empty
    pub status_text: String,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Body text
    pub body: String,
}

impl TransportResponse {
    /// Build a response with the canonical reason phrase for `status`
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            content_type: None,
            body: body.into(),
        }
    }

    /// Set the content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// 2xx status
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure (no usable response)
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport gave up waiting
    #[error("timed out")]
    Timeout,

    /// Connection, TLS, DNS or body read failure
    #[error("{0}")]
    Network(String),
}

/// A capability that POSTs a JSON body to a URL
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue one POST request
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<TransportResponse, TransportError>;

    /// Transport name (for logging)
    fn name(&self) -> &str;
}

/// Default transport over reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tslite/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CACHE_CONTROL, "no-store")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Network(format!("failed to connect to {url}"))
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        debug!(%url, status = status.as_u16(), bytes = text.len(), "Received response");

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body: text,
        })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
