//! # Client Error Types
//!
//! Error handling for upstream market data requests and client configuration.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ClientError {
    /// Create a status error from a non-success HTTP response
    pub fn status(status: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            status,
            reason: reason.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the failure is likely to clear up on its own.
    ///
    /// Nothing retries on this; it only shapes log output.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            ClientError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constructor() {
        let err = ClientError::status(404, "Not Found");
        match err {
            ClientError::Status { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            _ => panic!("Expected Status variant"),
        }
    }

    #[test]
    fn test_invalid_url_constructor() {
        let err = ClientError::invalid_url("not a url", "relative URL without a base");
        match err {
            ClientError::InvalidUrl { url, reason } => {
                assert_eq!(url, "not a url");
                assert_eq!(reason, "relative URL without a base");
            }
            _ => panic!("Expected InvalidUrl variant"),
        }
    }

    // ---- is_transient tests ----

    #[test]
    fn test_server_errors_are_transient() {
        assert!(ClientError::status(500, "Internal Server Error").is_transient());
        assert!(ClientError::status(503, "Service Unavailable").is_transient());
    }

    #[test]
    fn test_rate_limit_is_transient() {
        assert!(ClientError::status(429, "Too Many Requests").is_transient());
    }

    #[test]
    fn test_client_errors_not_transient() {
        assert!(!ClientError::status(400, "Bad Request").is_transient());
        assert!(!ClientError::status(404, "Not Found").is_transient());
    }

    #[test]
    fn test_parse_error_not_transient() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(!ClientError::Parse(json_err).is_transient());
    }

    #[test]
    fn test_config_error_not_transient() {
        assert!(!ClientError::config_error("bad").is_transient());
    }

    // ---- Display tests ----

    #[test]
    fn test_display_status() {
        let err = ClientError::status(404, "Not Found");
        assert_eq!(format!("{err}"), "HTTP 404: Not Found");
    }

    #[test]
    fn test_display_config_error() {
        let err = ClientError::config_error("timeout-secs must be greater than zero");
        assert_eq!(
            format!("{err}"),
            "Configuration error: timeout-secs must be greater than zero"
        );
    }

    #[test]
    fn test_display_invalid_url() {
        let err = ClientError::invalid_url("ftp:", "cannot be a base");
        assert_eq!(format!("{err}"), "Invalid upstream URL 'ftp:': cannot be a base");
    }

    // ---- From impls ----

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let err: ClientError = io_err.into();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let err: ClientError = toml_err.into();
        assert!(matches!(err, ClientError::Toml(_)));
    }
}
