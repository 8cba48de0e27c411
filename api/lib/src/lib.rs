//! Typed REST client with a closed error taxonomy.
//!
//! The `api` crate issues JSON requests against one configured base endpoint
//! and reports every outcome as a value: either the decoded payload or exactly
//! one [`ApiError`] variant.
//!
//! ## Features
//!
//! - **Single base endpoint**: paths are always resolved below it
//! - **Closed error set**: network, validation (422), unauthorized (401), server
//! - **Form support**: [`form::map_to_field_errors`] turns 422 payloads into
//!   per-field messages without losing unknown fields
//! - **Pluggable credentials**: a [`CredentialSource`] is consulted per request
//! - **Tracing**: each request runs in an `api_request` span
//!
//! ## Example
//!
//! ```rust,ignore
//! use api::{ApiClient, ApiError, ClientConfig, RequestDescriptor};
//! use api::form::map_to_field_errors;
//!
//! let client = ApiClient::from_config(&ClientConfig::from_env()?)?;
//!
//! let signup = RequestDescriptor::post("/accounts").json(&form)?.build();
//! match client.request::<Account>(&signup).await {
//!     Ok(account) => welcome(account),
//!     Err(ApiError::Validation(e)) => show(map_to_field_errors(&e, ["email", "password"])),
//!     Err(ApiError::Unauthorized(_)) => redirect_to_login(),
//!     Err(e) => notify_retry(e),
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod method;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use auth::{ApiAuthMethod, Credential, CredentialSource, StaticCredential};
pub use client::{ApiClient, ApiClientBuilder, DEFAULT_TIMEOUT_SECS};
pub use config::ClientConfig;
pub use error::{
    ApiError, ApiErrorKind, ApiResult, ConfigError, NetworkError, NetworkErrorKind, ServerError,
    ServerErrorKind, UnauthorizedError, ValidationError,
};
pub use form::{map_to_field_errors, FieldErrors, FORM_ERROR_KEY};
pub use method::RestMethod;
pub use request::{RequestBuilder, RequestDescriptor};
pub use response::{NoContent, ResponseFormat};
