//! Named, typed shared state with explicit providers.
//!
//! A [`ScopedContext`] pairs a provider ([`ScopedContext::provide`],
//! [`ScopedContext::scope`], [`ScopedContext::scope_future`]) with an accessor
//! ([`ScopedContext::use_value`]). Reading a context with no provider mounted
//! fails with a [`ConfigurationError`] naming the context, instead of silently
//! yielding a default.
//!
//! ```rust
//! use scoped_context::{create_scoped_context, ConfigurationError};
//!
//! #[derive(Clone)]
//! struct Session {
//!     user: String,
//! }
//!
//! let session = create_scoped_context::<Session>("Session");
//!
//! let err = session.use_value().err().unwrap();
//! assert_eq!(err, ConfigurationError::MissingProvider { context: "Session" });
//!
//! let user = session.scope(Session { user: "ada".into() }, || {
//!     session.use_value().map(|s| s.user)
//! });
//! assert_eq!(user.unwrap(), "ada");
//! ```
//!
//! Mounts are per thread. Values are never shared between threads, so `T`
//! needs neither `Send` nor `Sync`.

mod context;
mod error;
mod future;
mod registry;

pub use context::{create_scoped_context, ProviderGuard, ScopedContext};
pub use error::ConfigurationError;
pub use future::Scoped;
