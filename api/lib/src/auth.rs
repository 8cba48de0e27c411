//! Credential attachment.
//!
//! The client never stores or refreshes session material. A
//! [`CredentialSource`] is asked for the current credential on every request,
//! so whatever owns the session (a login flow, a token cache) can swap it
//! without rebuilding the client.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};

use crate::error::NetworkError;

/// How a credential is placed on the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApiAuthMethod {
    /// `Authorization: Bearer <credential>`.
    #[default]
    Bearer,
    /// `<header>: <credential>`, e.g. `X-Api-Key`.
    Header(String),
}

/// An opaque credential value.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret for placing it on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Supplies the credential for each outgoing request.
///
/// Implemented for closures, so `|| session.token()` works directly.
pub trait CredentialSource: Send + Sync {
    /// Returns the credential to attach, or `None` to send the request anonymously.
    fn credential(&self) -> Option<Credential>;
}

impl<F> CredentialSource for F
where
    F: Fn() -> Option<Credential> + Send + Sync,
{
    fn credential(&self) -> Option<Credential> {
        self()
    }
}

/// A credential that never changes.
#[derive(Debug, Clone)]
pub struct StaticCredential(Credential);

impl StaticCredential {
    /// Creates a source that always returns `value`.
    pub fn new(value: impl Into<Credential>) -> Self {
        Self(value.into())
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<Credential> {
        Some(self.0.clone())
    }
}

/// Method plus source, as stored on the client.
#[derive(Clone)]
pub(crate) struct Authenticator {
    pub(crate) method: ApiAuthMethod,
    pub(crate) source: Arc<dyn CredentialSource>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Builds the header carrying `credential` for `method`.
pub(crate) fn credential_header(
    method: &ApiAuthMethod,
    credential: &Credential,
) -> Result<(HeaderName, HeaderValue), NetworkError> {
    let (name, raw) = match method {
        ApiAuthMethod::Bearer => (AUTHORIZATION, format!("Bearer {}", credential.expose())),
        ApiAuthMethod::Header(name) => {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                NetworkError::invalid_request(format!("invalid credential header name: {e}"))
            })?;
            (name, credential.expose().to_string())
        }
    };

    let mut value = HeaderValue::try_from(raw)
        .map_err(|_| NetworkError::invalid_request("credential is not a valid header value"))?;
    value.set_sensitive(true);

    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let (name, value) =
            credential_header(&ApiAuthMethod::Bearer, &Credential::new("abc")).unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_custom_header() {
        let method = ApiAuthMethod::Header("X-Api-Key".to_string());
        let (name, value) = credential_header(&method, &Credential::new("k-1")).unwrap();
        assert_eq!(name.as_str(), "x-api-key");
        assert_eq!(value.to_str().unwrap(), "k-1");
    }

    #[test]
    fn test_newline_in_credential_is_rejected() {
        let result = credential_header(&ApiAuthMethod::Bearer, &Credential::new("a\nb"));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", Credential::new("super-secret"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_closure_source() {
        let source = || Some(Credential::new("from-closure"));
        assert_eq!(source.credential().unwrap().expose(), "from-closure");

        let anonymous = || -> Option<Credential> { None };
        assert!(CredentialSource::credential(&anonymous).is_none());
    }
}
