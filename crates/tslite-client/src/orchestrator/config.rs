use crate::schema::FieldMapping;
use std::time::Duration;

/// Default classification service origin
pub const DEFAULT_BASE_URL: &str = "https://tslite-api.onrender.com";

/// Default endpoint candidates (without, then with, trailing slash)
pub const DEFAULT_ENDPOINTS: &[&str] = &["/classify", "/classify/"];

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service origin, e.g. `https://tslite-api.onrender.com`
    pub base_url: String,
    /// Endpoint suffixes tried in order
    pub endpoints: Vec<String>,
    /// Wall-clock budget for each attempt
    pub timeout: Duration,
    /// Active wire field mapping
    pub field_mapping: FieldMapping,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| (*s).to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
            field_mapping: FieldMapping::default(),
        }
    }
}

impl ClientConfig {
    /// Create with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the endpoint candidates
    #[must_use]
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the wire field mapping
    #[must_use]
    pub fn with_field_mapping(mut self, field_mapping: FieldMapping) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    /// Full URL for an endpoint candidate
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if endpoint.is_empty() || endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        }
    }

    /// Timeout in milliseconds, as reported in errors
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}
