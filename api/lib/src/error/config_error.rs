//! Errors raised while assembling a client or a request.

use thiserror::Error;

/// Configuration and construction errors.
///
/// These are reported at startup or when a descriptor is built, never from
/// a request, and usually point at a programming or deployment mistake.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry a path (e.g. `mailto:`).
    #[error("Base URL cannot be a base: {url}")]
    CannotBeABase {
        /// The offending URL.
        url: String,
    },

    /// A header name or value was rejected.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("HTTP client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request body could not be serialized to JSON.
    #[error("Request body serialization failed: {0}")]
    Body(#[from] serde_json::Error),

    /// A required environment variable is missing or blank.
    #[error("Missing required environment variable: {name}")]
    MissingEnv {
        /// The variable name.
        name: &'static str,
    },

    /// An environment variable held an unusable value.
    #[error("Invalid value for {name}: {message}")]
    InvalidEnv {
        /// The variable name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
