//! Responses that arrived but cannot be used.

use thiserror::Error;

/// Why a received response was classified as a server error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerErrorKind {
    /// A non-2xx status other than 401 and 422.
    Status,
    /// A 2xx response whose body did not match the declared shape.
    Decode {
        /// Decoder message.
        reason: String,
    },
    /// A 422 response whose body was not a validation payload.
    MalformedValidation {
        /// Decoder message.
        reason: String,
    },
}

/// The server answered, but not with something the caller can use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server error (HTTP {status}){}", describe(.kind))]
pub struct ServerError {
    status: u16,
    body: Option<String>,
    kind: ServerErrorKind,
}

fn describe(kind: &ServerErrorKind) -> String {
    match kind {
        ServerErrorKind::Status => String::new(),
        ServerErrorKind::Decode { reason } => format!(": undecodable payload: {reason}"),
        ServerErrorKind::MalformedValidation { reason } => {
            format!(": malformed validation payload: {reason}")
        }
    }
}

impl ServerError {
    /// A plain non-success status.
    pub fn status(status: u16, body: Option<String>) -> Self {
        Self {
            status,
            body,
            kind: ServerErrorKind::Status,
        }
    }

    /// A success status whose payload failed to decode.
    pub fn decode(status: u16, body: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            status,
            body,
            kind: ServerErrorKind::Decode {
                reason: reason.into(),
            },
        }
    }

    /// A 422 whose payload was not `{ message?, errors }`.
    pub fn malformed_validation(body: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            status: 422,
            body,
            kind: ServerErrorKind::MalformedValidation {
                reason: reason.into(),
            },
        }
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Returns the raw body when it was readable as text.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the classification reason.
    pub fn kind(&self) -> &ServerErrorKind {
        &self.kind
    }

    /// Returns `true` when the payload, not the status, was the problem.
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self.kind, ServerErrorKind::Status)
    }
}
