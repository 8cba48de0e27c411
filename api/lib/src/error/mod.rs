//! Error taxonomy for the API client.
//!
//! Every call to [`ApiClient::request`](crate::ApiClient::request) ends in a
//! value, never a panic. Failures fall into exactly one family:
//! - [`NetworkError`] - no response was received
//! - [`ValidationError`] - the server rejected the input (HTTP 422)
//! - [`UnauthorizedError`] - the server rejected the credentials (HTTP 401)
//! - [`ServerError`] - any other non-2xx status, or a payload that did not decode
//!
//! [`ConfigError`] is separate: it is only produced while building a client or
//! a request descriptor, before any I/O happens.

mod api_error;
mod config_error;
mod network_error;
mod server_error;
mod unauthorized_error;
mod validation_error;

pub use api_error::{ApiError, ApiErrorKind, ApiResult};
pub use config_error::ConfigError;
pub use network_error::{NetworkError, NetworkErrorKind};
pub use server_error::{ServerError, ServerErrorKind};
pub use unauthorized_error::UnauthorizedError;
pub use validation_error::ValidationError;
