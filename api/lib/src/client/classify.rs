//! Status classification.
//!
//! Every status code maps to exactly one [`StatusClass`], and every
//! `(status, body)` pair maps to exactly one outcome. Nothing here panics.

use bytes::Bytes;
use strum::{Display, EnumIter};

use crate::error::{ApiResult, ServerError, UnauthorizedError, ValidationError};
use crate::response::ResponseFormat;

/// Bucket a status code falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StatusClass {
    /// `200..=299`: decode the body.
    Success,
    /// `401`.
    Unauthorized,
    /// `422`: parse field errors.
    Validation,
    /// Everything else.
    Server,
}

/// Classifies a status code.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        401 => StatusClass::Unauthorized,
        422 => StatusClass::Validation,
        _ => StatusClass::Server,
    }
}

/// Turns a received response into the caller's outcome.
pub fn classify_response<F: ResponseFormat>(status: u16, body: Bytes) -> ApiResult<F::Output> {
    match classify_status(status) {
        StatusClass::Success => F::parse(body.clone())
            .map_err(|e| ServerError::decode(status, body_text(&body), e.reason()).into()),
        StatusClass::Unauthorized => {
            Err(UnauthorizedError::new(String::from_utf8_lossy(&body)).into())
        }
        StatusClass::Validation => match ValidationError::from_body(&body) {
            Ok(validation) => Err(validation.into()),
            Err(e) => Err(ServerError::malformed_validation(body_text(&body), e.to_string()).into()),
        },
        StatusClass::Server => Err(ServerError::status(status, body_text(&body)).into()),
    }
}

fn body_text(body: &Bytes) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    std::str::from_utf8(body).ok().map(str::to_owned)
}
