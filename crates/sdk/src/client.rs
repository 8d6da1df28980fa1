//! Main client for the Apollo.io SDK.

use crate::api::*;
use crate::config::{
    with_trailing_slash, AuthScheme, ClientConfig, API_KEY_ENV, DEFAULT_APP_BASE_URL,
    DEFAULT_BASE_URL, DEFAULT_LEGACY_BASE_URL,
};
use crate::error::{ApolloError, ApolloResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Apollo.io API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApolloClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl ApolloClient {
    /// Create a new client builder.
    pub fn builder() -> ApolloClientBuilder {
        ApolloClientBuilder::new()
    }

    /// Create a client with default endpoints and the key from `APOLLO_IO_API_KEY`.
    pub fn from_env() -> ApolloResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::builder().api_key(api_key).build()
    }

    /// Create a client from configuration.
    fn from_config(config: ClientConfig) -> ApolloResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the people API.
    pub fn people(&self) -> PeopleApi<'_> {
        PeopleApi::new(self)
    }

    /// Get the organizations API.
    pub fn organizations(&self) -> OrganizationsApi<'_> {
        OrganizationsApi::new(self)
    }

    /// Get the employees API.
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi::new(self)
    }
}

impl std::fmt::Debug for ApolloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApolloClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("auth_scheme", &self.config.auth_scheme)
            .finish_non_exhaustive()
    }
}

/// Builder for creating an ApolloClient.
pub struct ApolloClientBuilder {
    api_key: Option<String>,
    auth_scheme: AuthScheme,
    host: Option<String>,
    base_url: Option<String>,
    legacy_base_url: Option<String>,
    app_base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ApolloClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            api_key: None,
            auth_scheme: AuthScheme::default(),
            host: None,
            base_url: None,
            legacy_base_url: None,
            app_base_url: None,
            timeout: None,
        }
    }

    /// Set the API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set how the API key is sent.
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Send every request to one host, keeping the upstream path layout
    /// (`/api/v1/`, `/v1/`, `/app/api/v1/`). Explicit base URLs still win.
    pub fn host(mut self, url: impl Into<String>) -> Self {
        self.host = Some(url.into());
        self
    }

    /// Set the base URL of the REST API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the base URL of the `/v1` API used by the employees lookup.
    pub fn legacy_base_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_base_url = Some(url.into());
        self
    }

    /// Set the base URL of the web app API used by the email lookup.
    pub fn app_base_url(mut self, url: impl Into<String>) -> Self {
        self.app_base_url = Some(url.into());
        self
    }

    /// Set a request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApolloResult<ApolloClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ApolloError::Config(format!("{} environment variable is required", API_KEY_ENV))
            })?;

        let host = self
            .host
            .as_deref()
            .map(|h| Url::parse(h).map(with_trailing_slash))
            .transpose()?;

        let resolve = |explicit: Option<String>, host_path: &str, default: &str| -> ApolloResult<Url> {
            let url = match (explicit, &host) {
                (Some(url), _) => Url::parse(&url)?,
                (None, Some(host)) => host.join(host_path)?,
                (None, None) => Url::parse(default)?,
            };
            Ok(with_trailing_slash(url))
        };

        let config = ClientConfig {
            api_key,
            auth_scheme: self.auth_scheme,
            base_url: resolve(self.base_url, "api/v1/", DEFAULT_BASE_URL)?,
            legacy_base_url: resolve(self.legacy_base_url, "v1/", DEFAULT_LEGACY_BASE_URL)?,
            app_base_url: resolve(self.app_base_url, "app/api/v1/", DEFAULT_APP_BASE_URL)?,
            timeout: self.timeout,
        };

        ApolloClient::from_config(config)
    }
}

impl Default for ApolloClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
