//! Per-call request description with a type-state builder.
//!
//! A [`RequestDescriptor`] is immutable once built and is meant to be created
//! fresh for each call. The builder tracks whether the method and path are set
//! at compile time, so an incomplete descriptor cannot be sent.

use std::marker::PhantomData;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::Url;

use crate::auth::Credential;
use crate::error::{ConfigError, NetworkError};
use crate::method::RestMethod;

/// Marker types for builder state tracking.
pub mod builder_state {
    /// Marker for a field that has not been set.
    pub struct Missing;
    /// Marker for a field that has been set.
    pub struct Present;
}

use builder_state::{Missing, Present};

/// Everything except RFC 3986 unreserved characters is encoded in a path value.
const PATH_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Everything needed to issue one request against the client's base endpoint.
///
/// ## Examples
///
/// ```rust
/// use api::{RequestDescriptor, RestMethod};
///
/// let descriptor = RequestDescriptor::builder()
///     .method(RestMethod::Get)
///     .path("/users/{id}/posts")
///     .path_param("id", "42")
///     .query("page", "2")
///     .build();
///
/// assert_eq!(descriptor.path(), "/users/42/posts");
/// assert_eq!(descriptor.query(), &[("page".to_string(), "2".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: RestMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    credential: Option<Credential>,
}

impl RequestDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder() -> RequestBuilder<Missing, Missing> {
        RequestBuilder::new()
    }

    /// Starts a `GET` request.
    pub fn get(path: impl Into<String>) -> RequestBuilder<Present, Present> {
        Self::builder().method(RestMethod::Get).path(path)
    }

    /// Starts a `POST` request.
    pub fn post(path: impl Into<String>) -> RequestBuilder<Present, Present> {
        Self::builder().method(RestMethod::Post).path(path)
    }

    /// Starts a `PUT` request.
    pub fn put(path: impl Into<String>) -> RequestBuilder<Present, Present> {
        Self::builder().method(RestMethod::Put).path(path)
    }

    /// Starts a `PATCH` request.
    pub fn patch(path: impl Into<String>) -> RequestBuilder<Present, Present> {
        Self::builder().method(RestMethod::Patch).path(path)
    }

    /// Starts a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> RequestBuilder<Present, Present> {
        Self::builder().method(RestMethod::Delete).path(path)
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// Returns the path with parameters already substituted.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if one was attached.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Returns the query pairs in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the per-request headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the per-request credential, which overrides the client's source.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Returns `{name}` placeholders that were never substituted.
    pub fn unresolved_params(&self) -> Vec<&str> {
        let mut params = Vec::new();
        let mut rest = self.path.as_str();

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                break;
            };
            if close > 0 {
                params.push(&after[..close]);
            }
            rest = &after[close + 1..];
        }

        params
    }

    /// Resolves the path and query against `base`.
    ///
    /// The path is always appended below the base path; absolute URLs,
    /// scheme-relative paths and `..` segments that climb out of the base are
    /// rejected. A colon inside a segment (`/accounts:lookup`) is a plain
    /// path character.
    pub fn resolve(&self, base: &Url) -> Result<Url, NetworkError> {
        let path = self.path.trim();

        if path.starts_with("//") || is_absolute_url(path) {
            return Err(NetworkError::invalid_request(format!(
                "path must be relative to the base endpoint: {path}"
            )));
        }

        let unresolved = self.unresolved_params();
        if !unresolved.is_empty() {
            return Err(NetworkError::invalid_request(format!(
                "unsubstituted path parameters: {}",
                unresolved.join(", ")
            )));
        }

        let mut root = base.clone();
        root.set_query(None);
        root.set_fragment(None);
        if !root.path().ends_with('/') {
            let with_slash = format!("{}/", root.path());
            root.set_path(&with_slash);
        }

        // The `./` prefix keeps a colon in the first segment from reading as a scheme.
        let mut url = root
            .join(&format!("./{}", path.trim_start_matches('/')))
            .map_err(|e| NetworkError::invalid_request(format!("invalid path: {e}")))?;

        if !url.as_str().starts_with(root.as_str()) {
            return Err(NetworkError::invalid_request(format!(
                "path escapes the base endpoint: {path}"
            )));
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

/// Type-state builder for [`RequestDescriptor`].
///
/// ## Type Parameters
///
/// - `M`: State of the method field (`Missing` or `Present`).
/// - `P`: State of the path field (`Missing` or `Present`).
pub struct RequestBuilder<M, P> {
    method: Option<RestMethod>,
    path: Option<String>,
    params: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    credential: Option<Credential>,
    _state: PhantomData<(M, P)>,
}

impl RequestBuilder<Missing, Missing> {
    /// Creates a builder with nothing set.
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            params: Vec::new(),
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
            credential: None,
            _state: PhantomData,
        }
    }
}

impl Default for RequestBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, P> RequestBuilder<M, P> {
    fn transition<M2, P2>(self) -> RequestBuilder<M2, P2> {
        RequestBuilder {
            method: self.method,
            path: self.path,
            params: self.params,
            body: self.body,
            query: self.query,
            headers: self.headers,
            credential: self.credential,
            _state: PhantomData,
        }
    }

    /// Substitutes `{name}` in the path with `value`, percent-encoded as one segment.
    pub fn path_param(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.params
            .push((name.into(), encode_segment(value.as_ref())));
        self
    }

    /// Appends a query pair; repeated keys are kept in order.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds a per-request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a credential for this request only.
    pub fn credential(mut self, credential: impl Into<Credential>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Body`] if `body` cannot be represented as JSON
    /// (e.g. a map with non-string keys).
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ConfigError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl<P> RequestBuilder<Missing, P> {
    /// Sets the HTTP method.
    pub fn method(mut self, method: RestMethod) -> RequestBuilder<Present, P> {
        self.method = Some(method);
        self.transition()
    }
}

impl<M> RequestBuilder<M, Missing> {
    /// Sets the path relative to the base endpoint; may contain `{name}` placeholders.
    pub fn path(mut self, path: impl Into<String>) -> RequestBuilder<M, Present> {
        self.path = Some(path.into());
        self.transition()
    }
}

impl RequestBuilder<Present, Present> {
    /// Builds the descriptor, substituting path parameters.
    pub fn build(self) -> RequestDescriptor {
        let mut path = self.path.unwrap_or_default();
        for (name, value) in &self.params {
            path = path.replace(&format!("{{{name}}}"), value);
        }

        RequestDescriptor {
            method: self.method.unwrap_or(RestMethod::Get),
            path,
            body: self.body,
            query: self.query,
            headers: self.headers,
            credential: self.credential,
        }
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_VALUE_ENCODE_SET).to_string()
}

/// Returns `true` for strings that name their own host, like
/// `https://other.example/x` or `https:other.example`.
///
/// Opaque forms such as `accounts:lookup` parse as cannot-be-a-base URLs and
/// are treated as relative paths.
fn is_absolute_url(path: &str) -> bool {
    Url::parse(path).is_ok_and(|url| !url.cannot_be_a_base())
}
