//! Credential rejection.

use thiserror::Error;

/// The server answered `401 Unauthorized`.
///
/// The raw body is kept because some servers explain the rejection there
/// (expired token, revoked key). It may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unauthorized{}", display_suffix(.body))]
pub struct UnauthorizedError {
    body: String,
}

fn display_suffix(body: &str) -> String {
    if body.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", body.trim())
    }
}

impl UnauthorizedError {
    /// Creates an error from the response body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }
}
