//! Top-level API error type.

use strum::{AsRefStr, Display};
use thiserror::Error;

use super::{NetworkError, ServerError, UnauthorizedError, ValidationError};
use crate::form::{map_to_field_errors, FieldErrors};

/// Outcome of one client call: `Ok` is success, `Err` is exactly one failure variant.
pub type ApiResult<T> = Result<T, ApiError>;

/// Closed set of failures a request can end in.
///
/// ## Examples
///
/// ```rust,ignore
/// use api::ApiError;
///
/// match client.request::<Account>(&descriptor).await {
///     Ok(account) => show(account),
///     Err(ApiError::Validation(e)) => highlight_fields(e.errors()),
///     Err(ApiError::Unauthorized(_)) => redirect_to_login(),
///     Err(e) => show_retry_notice(e),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// The server rejected the input field by field (HTTP 422).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server rejected the credentials (HTTP 401).
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    /// Any other non-2xx status, or an undecodable payload.
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Discriminant of [`ApiError`], handy for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ApiErrorKind {
    NetworkError,
    ValidationError,
    UnauthorizedError,
    ServerError,
}

impl ApiError {
    /// Returns the variant without its payload.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Network(_) => ApiErrorKind::NetworkError,
            Self::Validation(_) => ApiErrorKind::ValidationError,
            Self::Unauthorized(_) => ApiErrorKind::UnauthorizedError,
            Self::Server(_) => ApiErrorKind::ServerError,
        }
    }

    /// Returns the HTTP status when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(_) => None,
            Self::Validation(_) => Some(422),
            Self::Unauthorized(_) => Some(401),
            Self::Server(e) => Some(e.status_code()),
        }
    }

    /// Returns `true` when showing a generic "try again" notice makes sense.
    ///
    /// Validation and credential failures need the user to change something
    /// first, so they are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server(_))
    }

    /// Returns the validation payload, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Maps a validation failure onto form fields; `None` for every other variant.
    pub fn field_errors<I, S>(&self, known_fields: I) -> Option<FieldErrors>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.as_validation()
            .map(|e| map_to_field_errors(e, known_fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkErrorKind;
    use crate::form::FORM_ERROR_KEY;

    #[test]
    fn test_kind_labels() {
        let err: ApiError = UnauthorizedError::new("").into();
        assert_eq!(err.kind(), ApiErrorKind::UnauthorizedError);
        assert_eq!(err.kind().as_ref(), "unauthorized_error");
        assert_eq!(ApiErrorKind::ServerError.to_string(), "server_error");
    }

    #[test]
    fn test_status() {
        let network: ApiError = NetworkError::new(NetworkErrorKind::Connect, "refused").into();
        assert_eq!(network.status(), None);

        let server: ApiError = ServerError::status(502, None).into();
        assert_eq!(server.status(), Some(502));

        let validation: ApiError = ValidationError::default().into();
        assert_eq!(validation.status(), Some(422));
    }

    #[test]
    fn test_retryable() {
        let network: ApiError = NetworkError::new(NetworkErrorKind::Timeout, "slow").into();
        let server: ApiError = ServerError::status(500, None).into();
        let unauthorized: ApiError = UnauthorizedError::new("").into();
        let validation: ApiError = ValidationError::default().into();

        assert!(network.is_retryable());
        assert!(server.is_retryable());
        assert!(!unauthorized.is_retryable());
        assert!(!validation.is_retryable());
    }

    #[test]
    fn test_field_errors_only_for_validation() {
        let validation: ApiError = ValidationError::default()
            .with_field_message("email", "is invalid")
            .with_field_message("nickname", "is reserved")
            .into();

        let fields = validation.field_errors(["email"]).unwrap();
        assert_eq!(fields.get("email"), Some("is invalid"));
        assert_eq!(fields.get(FORM_ERROR_KEY), Some("is reserved"));

        let server: ApiError = ServerError::status(500, None).into();
        assert!(server.field_errors(["email"]).is_none());
    }

    #[test]
    fn test_network_display() {
        let err: ApiError = NetworkError::new(NetworkErrorKind::Connect, "connection refused").into();
        assert_eq!(
            err.to_string(),
            "network error: connect failure: connection refused"
        );
    }
}
