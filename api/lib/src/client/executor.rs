//! Request execution with tracing instrumentation.
//!
//! This module provides the [`ApiClient`] struct for executing requests
//! against a single base endpoint with credential attachment and tracing.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{instrument, Span};
use url::Url;

use super::classify::classify_response;
use crate::auth::{credential_header, ApiAuthMethod, Authenticator, CredentialSource};
use crate::error::{ApiError, ApiResult, ConfigError, NetworkError};
use crate::request::RequestDescriptor;
use crate::response::{JsonFormat, ResponseFormat};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    user_agent: Option<String>,
    auth: Option<Authenticator>,
}

impl ApiClientBuilder {
    /// Creates a new builder with the specified base URL.
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            user_agent: None,
            auth: None,
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let header_name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Attaches credentials from `source` to every request.
    ///
    /// The source is consulted per request; returning `None` sends the
    /// request without credentials.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use api::{ApiAuthMethod, StaticCredential};
    ///
    /// let client = ApiClient::builder(base_url)
    ///     .credentials(ApiAuthMethod::Bearer, StaticCredential::new("sk-xxx"))
    ///     .build()?;
    /// ```
    pub fn credentials(
        mut self,
        method: ApiAuthMethod,
        source: impl CredentialSource + 'static,
    ) -> Self {
        self.auth = Some(Authenticator {
            method,
            source: Arc::new(source),
        });
        self
    }

    /// Builds the [`ApiClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<ApiClient, ConfigError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase {
                url: self.base_url.to_string(),
            });
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        let mut base_url = self.base_url;
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(ApiClient {
            client,
            base_url,
            timeout: self.timeout,
            auth: self.auth,
        })
    }
}

/// Async HTTP client bound to one base endpoint.
///
/// The base endpoint is fixed at construction. Clones share the connection
/// pool, so pass a configured client around instead of rebuilding it.
///
/// ## Examples
///
/// ```rust,ignore
/// use api::{ApiClient, ApiError, RequestDescriptor};
/// use url::Url;
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64, name: String }
///
/// let client = ApiClient::new(Url::parse("https://api.example.com")?)?;
///
/// match client.request::<User>(&RequestDescriptor::get("/users/1").build()).await {
///     Ok(user) => println!("User: {}", user.name),
///     Err(ApiError::Unauthorized(_)) => println!("please log in"),
///     Err(e) => println!("failed: {e}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    auth: Option<Authenticator>,
}

impl ApiClient {
    /// Creates a new builder for configuring an API client.
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Creates a new API client with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        Self::builder(base_url).build()
    }

    /// Returns the base URL for this client.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues a request and decodes a JSON success body into `T`.
    ///
    /// Never panics: every outcome is either `Ok(T)` or one [`ApiError`]
    /// variant.
    ///
    /// ## Empty bodies
    ///
    /// An empty 2xx body (e.g. `204 No Content`) is decoded as JSON `null`.
    /// Declare `T` as [`NoContent`](crate::NoContent), `()` or `Option<_>` for
    /// endpoints that may answer without a body; those yield `Ok` with the
    /// explicit "no content" value. A struct `T` cannot be built from `null`,
    /// so the same response then becomes [`ApiError::Server`] with a decode
    /// failure.
    pub async fn request<T>(&self, descriptor: &RequestDescriptor) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        self.request_as::<JsonFormat<T>>(descriptor).await
    }

    /// Issues a request and decodes the success body with format `F`.
    #[instrument(
        name = "api_request",
        skip(self, descriptor),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn request_as<F>(&self, descriptor: &RequestDescriptor) -> ApiResult<F::Output>
    where
        F: ResponseFormat,
    {
        let span = Span::current();
        span.record("http.method", descriptor.method().to_string().as_str());

        let url = match descriptor.resolve(&self.base_url) {
            Ok(url) => url,
            Err(e) => return Err(self.network_failure(e)),
        };
        span.record("http.url", url.as_str());

        let request = match self.prepare::<F>(descriptor, url) {
            Ok(request) => request,
            Err(e) => return Err(self.network_failure(e)),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.network_failure(NetworkError::from(e))),
        };

        let status = response.status().as_u16();
        span.record("http.status_code", status);

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.network_failure(NetworkError::body(e))),
        };

        let outcome = classify_response::<F>(status, body);
        match &outcome {
            Ok(_) => {
                span.record("otel.status_code", "OK");
                tracing::debug!(status, "request succeeded");
            }
            Err(e) => {
                let otel_status = if status >= 500 { "ERROR" } else { "UNSET" };
                span.record("otel.status_code", otel_status);
                tracing::warn!(status, error.kind = %e.kind(), error = %e, "request failed");
            }
        }
        outcome
    }

    /// Assembles the transport request: headers, credential, body.
    fn prepare<F: ResponseFormat>(
        &self,
        descriptor: &RequestDescriptor,
        url: Url,
    ) -> Result<reqwest::RequestBuilder, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(F::content_type()));

        for (name, value) in descriptor.headers() {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                NetworkError::invalid_request(format!("invalid header name {name:?}: {e}"))
            })?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                NetworkError::invalid_request(format!("invalid value for header {name:?}: {e}"))
            })?;
            headers.append(header_name, header_value);
        }

        let method = self
            .auth
            .as_ref()
            .map(|auth| auth.method.clone())
            .unwrap_or_default();
        let credential = descriptor
            .credential()
            .cloned()
            .or_else(|| self.auth.as_ref().and_then(|auth| auth.source.credential()));
        if let Some(credential) = credential {
            let (name, value) = credential_header(&method, &credential)?;
            headers.insert(name, value);
        }

        let mut request = self
            .client
            .request(descriptor.method().into(), url)
            .headers(headers);

        if let Some(body) = descriptor.body() {
            if !descriptor.method().accepts_body() {
                return Err(NetworkError::invalid_request(format!(
                    "{} requests cannot carry a body",
                    descriptor.method()
                )));
            }
            request = request.json(body);
        }

        Ok(request)
    }

    fn network_failure(&self, err: NetworkError) -> ApiError {
        Span::current().record("otel.status_code", "ERROR");
        tracing::error!(error.kind = %err.kind(), error = %err, "request did not reach the server");
        err.into()
    }
}
