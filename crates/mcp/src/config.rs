use anyhow::{Context, Result};
use apollo_io_sdk::config::{DEFAULT_APP_BASE_URL, DEFAULT_BASE_URL, DEFAULT_LEGACY_BASE_URL};
use apollo_io_sdk::{ApolloClient, AuthScheme};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "apollo-io-mcp.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub apollo: ApolloSection,
}

/// `[apollo]` table: where and how to reach the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApolloSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_legacy_base_url")]
    pub legacy_base_url: String,

    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,

    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,

    /// Request timeout; unset means no client-side timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_legacy_base_url() -> String {
    DEFAULT_LEGACY_BASE_URL.to_string()
}

fn default_app_base_url() -> String {
    DEFAULT_APP_BASE_URL.to_string()
}

fn default_auth_scheme() -> String {
    "api-key-header".to_string()
}

impl Default for ApolloSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            legacy_base_url: default_legacy_base_url(),
            app_base_url: default_app_base_url(),
            auth_scheme: default_auth_scheme(),
            timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Load the config file if it exists, otherwise use defaults.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(path = %config_path.display(), "Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", config_path.display()))?;

        tracing::info!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Auth scheme from the file, unless overridden on the command line.
    pub fn auth_scheme(&self, auth_override: Option<&str>) -> Result<AuthScheme> {
        auth_override
            .unwrap_or(&self.apollo.auth_scheme)
            .parse::<AuthScheme>()
            .map_err(anyhow::Error::msg)
    }

    /// Build the upstream client.
    pub fn build_client(&self, api_key: &str, auth_override: Option<&str>) -> Result<ApolloClient> {
        let mut builder = ApolloClient::builder()
            .api_key(api_key)
            .auth_scheme(self.auth_scheme(auth_override)?)
            .base_url(&self.apollo.base_url)
            .legacy_base_url(&self.apollo.legacy_base_url)
            .app_base_url(&self.apollo.app_base_url);

        if let Some(secs) = self.apollo.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build().context("Failed to create Apollo.io client")
    }
}
