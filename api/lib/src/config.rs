//! Process-start configuration.
//!
//! The base endpoint and credential are read once, turned into an
//! [`ApiClient`], and the client is passed to whoever needs it.

use std::time::Duration;

use url::Url;

use crate::auth::{ApiAuthMethod, StaticCredential};
use crate::client::{ApiClient, ApiClientBuilder};
use crate::error::ConfigError;

/// Base endpoint URL (required).
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Request timeout in whole seconds (optional).
pub const ENV_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";
/// Credential attached to every request (optional).
pub const ENV_TOKEN: &str = "API_TOKEN";
/// Header carrying [`ENV_TOKEN`] instead of `Authorization: Bearer` (optional).
pub const ENV_AUTH_HEADER: &str = "API_AUTH_HEADER";

/// Settings needed to build an [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub token: Option<String>,
    pub auth_header: Option<String>,
}

impl ClientConfig {
    /// Creates a config with the default timeout and no credential.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(crate::client::DEFAULT_TIMEOUT_SECS),
            token: None,
            auth_header: None,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// ## Errors
    ///
    /// Returns an error if `API_BASE_URL` is missing or any value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_url = read(ENV_BASE_URL).ok_or(ConfigError::MissingEnv { name: ENV_BASE_URL })?;
        let mut config = Self::new(Url::parse(&raw_url)?);

        if let Some(raw) = read(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|e| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                message: format!("{raw:?} is not a whole number of seconds: {e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.token = read(ENV_TOKEN);
        config.auth_header = read(ENV_AUTH_HEADER);

        Ok(config)
    }

    /// Returns the credential placement implied by `auth_header`.
    pub fn auth_method(&self) -> ApiAuthMethod {
        match &self.auth_header {
            Some(header) => ApiAuthMethod::Header(header.clone()),
            None => ApiAuthMethod::Bearer,
        }
    }

    /// Returns a builder preloaded with this configuration.
    pub fn builder(&self) -> ApiClientBuilder {
        let builder = ApiClient::builder(self.base_url.clone()).timeout(self.timeout);
        match &self.token {
            Some(token) => builder.credentials(self.auth_method(), StaticCredential::new(token.as_str())),
            None => builder,
        }
    }
}

impl ApiClient {
    /// Builds a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.builder().build()
    }
}
