//! HTTP client module.
//!
//! [`ApiClient`] owns the transport and the base endpoint; [`classify`]
//! holds the pure status-to-outcome rules so they can be tested without a
//! server.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use api::{ApiAuthMethod, ApiClient, RequestDescriptor};
//! use url::Url;
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let client = ApiClient::builder(Url::parse("https://api.example.com/v1")?)
//!     .credentials(ApiAuthMethod::Bearer, move || session.token())
//!     .build()?;
//!
//! let user: User = client
//!     .request(&RequestDescriptor::get("/users/{id}").path_param("id", "1").build())
//!     .await?;
//! ```

pub mod classify;
mod executor;

pub use classify::{classify_response, classify_status, StatusClass};
pub use executor::{ApiClient, ApiClientBuilder, DEFAULT_TIMEOUT_SECS};
