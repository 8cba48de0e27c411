//! Response format trait and implementations.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// A 2xx body that does not match the declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeError(String);

impl DecodeError {
    /// Creates a decode error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Returns the reason the body was rejected.
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Strategy for turning a success body into a typed value.
///
/// ## Examples
///
/// ```rust,ignore
/// use api::response::{JsonFormat, PlainTextFormat};
///
/// let user = client.request_as::<JsonFormat<User>>(&descriptor).await?;
/// let banner = client.request_as::<PlainTextFormat>(&motd).await?;
/// ```
pub trait ResponseFormat: Send + Sync {
    /// The output type after parsing.
    type Output: Send;

    /// Parses a success body. An empty slice means the server sent no content.
    fn parse(body: bytes::Bytes) -> Result<Self::Output, DecodeError>;

    /// Value for the `Accept` header.
    fn content_type() -> &'static str;
}

/// JSON response format with typed deserialization.
///
/// An empty body is decoded as JSON `null`, so `T = NoContent`, `()` or
/// `Option<_>` accept it while a struct type reports a decode error.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned + Send> ResponseFormat for JsonFormat<T> {
    type Output = T;

    fn parse(body: bytes::Bytes) -> Result<Self::Output, DecodeError> {
        let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &body
        };
        serde_json::from_slice(body).map_err(|e| DecodeError::new(e.to_string()))
    }

    fn content_type() -> &'static str {
        "application/json"
    }
}

/// Plain text response format; the body must be valid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormat;

impl ResponseFormat for PlainTextFormat {
    type Output = String;

    fn parse(body: bytes::Bytes) -> Result<Self::Output, DecodeError> {
        String::from_utf8(body.to_vec()).map_err(|e| DecodeError::new(format!("invalid UTF-8: {e}")))
    }

    fn content_type() -> &'static str {
        "text/plain"
    }
}

/// Binary response format; returns the raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl ResponseFormat for BinaryFormat {
    type Output = bytes::Bytes;

    fn parse(body: bytes::Bytes) -> Result<Self::Output, DecodeError> {
        Ok(body)
    }

    fn content_type() -> &'static str {
        "application/octet-stream"
    }
}
