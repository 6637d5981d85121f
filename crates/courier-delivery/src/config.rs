//! Delivery sink configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeliveryError, Result};

/// Default connect and request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default media type for the Content-Type and Accept headers.
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// Immutable configuration for the HTTP delivery sink.
///
/// Validated once when the sink is constructed; invalid values are a fatal
/// construction error, never a per-event one. Timeouts are millisecond
/// counts, unsigned so a negative value is unrepresentable. The hosting
/// runtime can deserialize this from its own configuration layer; every field
/// except `endpoint` has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Fully qualified URL to POST event bodies to. Required.
    pub endpoint: String,

    /// Socket connect timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum request processing time in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Value sent as the Content-Type header.
    #[serde(default = "default_media_type")]
    pub content_type: String,

    /// Value sent as the Accept header.
    #[serde(default = "default_media_type")]
    pub accept: String,
}

impl DeliveryConfig {
    /// Creates a configuration for the given endpoint with default timeouts
    /// and headers.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout_ms: default_timeout_ms(),
            request_timeout_ms: default_timeout_ms(),
            content_type: default_media_type(),
            accept: default_media_type(),
        }
    }

    /// Parses and validates the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Configuration`] if the endpoint is not an
    /// absolute http or https URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| DeliveryError::configuration(format!("endpoint URL invalid: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DeliveryError::configuration(format!(
                "endpoint URL scheme must be http or https, got {}",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_media_type() -> String {
    DEFAULT_MEDIA_TYPE.to_string()
}
