//! Failures that happen before a response arrives.

use strum::{AsRefStr, Display};
use thiserror::Error;

/// What part of the exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NetworkErrorKind {
    /// The connection could not be established (refused, DNS, TLS).
    Connect,
    /// The configured timeout elapsed.
    Timeout,
    /// The request could not be assembled (bad path, bad header).
    InvalidRequest,
    /// Headers arrived but the body could not be read.
    Body,
    /// Any other transport failure.
    Other,
}

/// The request never produced a usable response.
#[derive(Debug, Error)]
#[error("{kind} failure: {message}")]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
    #[source]
    source: Option<reqwest::Error>,
}

impl NetworkError {
    /// Creates an error that has no underlying transport cause.
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a request-construction error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(NetworkErrorKind::InvalidRequest, message)
    }

    /// Wraps a body read failure that happened after the status line arrived.
    pub fn body(err: reqwest::Error) -> Self {
        Self {
            kind: NetworkErrorKind::Body,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    /// Returns the human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Connect
        } else if err.is_builder() {
            NetworkErrorKind::InvalidRequest
        } else if err.is_body() || err.is_decode() {
            NetworkErrorKind::Body
        } else {
            NetworkErrorKind::Other
        };

        Self {
            kind,
            message: err.to_string(),
            source: Some(err),
        }
    }
}
