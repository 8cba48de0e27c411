//! Context misuse errors.

use thiserror::Error;

/// A scoped context was used in a way its wiring does not allow.
///
/// This always indicates a structural mistake (a missing provider above the
/// caller), so callers normally let it abort the current code path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The context was read with no enclosing provider.
    #[error("context `{context}` was read outside of any provider; mount a provider for `{context}` above this call")]
    MissingProvider {
        /// Name the context was created with.
        context: &'static str,
    },
}

impl ConfigurationError {
    /// Returns the name of the context involved.
    pub fn context(&self) -> &'static str {
        match self {
            Self::MissingProvider { context } => context,
        }
    }
}
