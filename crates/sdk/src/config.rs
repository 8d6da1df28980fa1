//! Configuration types for the Apollo.io SDK.

use std::time::Duration;
use url::Url;

/// Default base URL for the public REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.apollo.io/api/v1/";

/// Base URL used by the company lookup in the employees search.
pub const DEFAULT_LEGACY_BASE_URL: &str = "https://api.apollo.io/v1/";

/// Base URL of the web app API that reveals prospect emails.
pub const DEFAULT_APP_BASE_URL: &str = "https://app.apollo.io/api/v1/";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "APOLLO_IO_API_KEY";

/// How the API key is attached to outbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// `x-api-key: <key>`
    #[default]
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl std::str::FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api-key-header" | "x-api-key" | "api-key" => Ok(Self::ApiKeyHeader),
            "bearer" => Ok(Self::Bearer),
            other => Err(format!("unknown auth scheme: {}", other)),
        }
    }
}

/// Which upstream API a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    Api,
    Legacy,
    App,
}

/// Configuration for the Apollo.io client.
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Header used to carry the API key.
    pub auth_scheme: AuthScheme,
    /// Base URL of the REST API.
    pub base_url: Url,
    /// Base URL of the older `/v1` API.
    pub legacy_base_url: Url,
    /// Base URL of the web app API.
    pub app_base_url: Url,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Base URL for the given API.
    pub fn base(&self, base: ApiBase) -> &Url {
        match base {
            ApiBase::Api => &self.base_url,
            ApiBase::Legacy => &self.legacy_base_url,
            ApiBase::App => &self.app_base_url,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("auth_scheme", &self.auth_scheme)
            .field("base_url", &self.base_url.as_str())
            .field("legacy_base_url", &self.legacy_base_url.as_str())
            .field("app_base_url", &self.app_base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Ensure the URL path ends in `/` so relative paths join beneath it.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
