//! Orchestrator - one classification call over an unreliable contract
//!
//! `submit` validates the request, encodes it through the active field
//! mapping and walks the endpoint candidates in order:
//! - HTTP 404: remembered, next candidate
//! - timeout: stop, no further candidates
//! - any other failure or non-2xx status: stop and surface it
//! - 2xx: decode permissively and normalize
//!
//! Each attempt gets its own timeout; when it fires the in-flight call is
//! dropped, which cancels it.

mod config;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT};

use crate::decode::{decode_body, error_detail};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::transport::{ReqwestTransport, Transport, TransportError, TransportResponse};
use crate::types::{ClassificationRequest, ClassificationResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Turns classification requests into normalized results or typed failures
#[derive(Clone)]
pub struct RequestOrchestrator {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl RequestOrchestrator {
    /// Create an orchestrator over the default reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    /// Create an orchestrator over a given transport
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Classify a product
    ///
    /// Fails with [`Error::Validation`] without touching the network when
    /// the description is blank.
    #[instrument(
        skip(self, request),
        fields(mapping = %self.config.field_mapping.version, transport = self.transport.name())
    )]
    pub async fn submit(&self, request: &ClassificationRequest) -> Result<ClassificationResult> {
        request.validate()?;

        let payload = self.config.field_mapping.encode_request(request);
        let mut last_error: Option<Error> = None;

        for endpoint in &self.config.endpoints {
            let url = self.config.url_for(endpoint);
            debug!(%url, "Trying endpoint");

            let response = match self.attempt(&url, &payload).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(%url, error = %e, "Classification attempt failed");
                    return Err(e);
                }
            };

            if response.status == 404 {
                debug!(%url, "Endpoint not found, trying next candidate");
                last_error = Some(self.service_error(&response));
                continue;
            }

            let result = self.interpret(response, request.description());
            match &result {
                Ok(r) => info!(%url, hts_code = %r.hts_code, "Classification succeeded"),
                Err(e) => warn!(%url, error = %e, "Classification rejected"),
            }
            return result;
        }

        Err(last_error.unwrap_or_else(|| Error::Network("request failed".to_string())))
    }

    /// One transport call bounded by the per-attempt timeout
    async fn attempt(&self, url: &str, payload: &Value) -> Result<TransportResponse> {
        let call = self.transport.post_json(url, payload);

        match tokio::time::timeout(self.config.timeout, call).await {
            Err(_) => Err(Error::Timeout(self.config.timeout_ms())),
            Ok(Err(TransportError::Timeout)) => Err(Error::Timeout(self.config.timeout_ms())),
            Ok(Err(TransportError::Network(message))) => Err(Error::Network(message)),
            Ok(Ok(response)) => Ok(response),
        }
    }

    fn service_error(&self, response: &TransportResponse) -> Error {
        let body = decode_body(&response.body);
        Error::Service {
            status: response.status,
            detail: error_detail(&body, &response.body, response.status, &response.status_text),
        }
    }

    fn interpret(
        &self,
        response: TransportResponse,
        description: &str,
    ) -> Result<ClassificationResult> {
        if !response.is_success() {
            return Err(self.service_error(&response));
        }

        let body = decode_body(&response.body);
        match body.as_object() {
            Some(map) => Ok(normalize(
                map,
                &self.config.field_mapping.response,
                description,
            )),
            None => Err(Error::Protocol(format!(
                "expected a JSON object, got {}",
                body.kind()
            ))),
        }
    }
}
