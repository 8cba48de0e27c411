//! Field-level rejection reported by the server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The server rejected the request as semantically invalid (HTTP 422).
///
/// The wire shape is `{ "message"?: string, "errors": { field: [string] } }`.
/// Fields the server did not mention are absent from [`errors`](Self::errors);
/// they are never defaulted to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", summarize(.message, .errors))]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Creates an error from a field mapping and optional top-level message.
    pub fn new(errors: BTreeMap<String, Vec<String>>, message: Option<String>) -> Self {
        Self { message, errors }
    }

    /// Parses a 422 response body.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Adds a message for `field`, keeping earlier messages first.
    pub fn with_field_message(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.entry(field.into()).or_default().push(message.into());
        self
    }

    /// Sets the non-field message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the non-field message, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the per-field messages.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns the messages for one field, or `None` when the server did not name it.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }
}

fn summarize(message: &Option<String>, errors: &BTreeMap<String, Vec<String>>) -> String {
    match (message, errors.len()) {
        (Some(message), _) => format!("validation failed: {message}"),
        (None, 1) => "validation failed for 1 field".to_string(),
        (None, n) => format!("validation failed for {n} fields"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_with_message() {
        let body = br#"{"message":"check the form","errors":{"email":["is invalid","is taken"]}}"#;
        let err = ValidationError::from_body(body).unwrap();

        assert_eq!(err.message(), Some("check the form"));
        assert_eq!(
            err.field("email"),
            Some(&["is invalid".to_string(), "is taken".to_string()][..])
        );
        assert_eq!(err.field("password"), None);
    }

    #[test]
    fn test_from_body_requires_errors() {
        assert!(ValidationError::from_body(br#"{"message":"nope"}"#).is_err());
        assert!(ValidationError::from_body(br#"{"errors":["email"]}"#).is_err());
        assert!(ValidationError::from_body(b"<html>").is_err());
    }

    #[test]
    fn test_empty_list_is_kept() {
        let err = ValidationError::from_body(br#"{"errors":{"name":[]}}"#).unwrap();
        assert_eq!(err.field("name"), Some(&[][..]));
    }

    #[test]
    fn test_display() {
        let err = ValidationError::default().with_field_message("email", "is invalid");
        assert_eq!(err.to_string(), "validation failed for 1 field");

        let err = err.with_message("bad input");
        assert_eq!(err.to_string(), "validation failed: bad input");
    }
}
