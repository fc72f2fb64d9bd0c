//! TSLite Client - Classification Request Orchestration
//!
//! This crate turns a product description into a normalized tariff
//! classification:
//! - Types: request and normalized result shared with the history store
//! - Schema: versioned wire field mappings (v1, v2, hs)
//! - Transport: the HTTP capability (reqwest by default)
//! - Orchestrator: endpoint fallback, per-attempt timeout, error classification

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decode;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod schema;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use orchestrator::{ClientConfig, RequestOrchestrator, DEFAULT_BASE_URL, DEFAULT_ENDPOINTS};
pub use schema::{FieldMapping, RequestFields, ResponseFields};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};
pub use types::{ClassificationRequest, ClassificationResult, ResultItem};
