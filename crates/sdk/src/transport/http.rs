//! HTTP transport layer for the Apollo.io SDK.

use crate::config::{ApiBase, AuthScheme, ClientConfig};
use crate::error::{ApolloError, ApolloResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> ApolloResult<Self> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-cache"),
        );

        match config.auth_scheme {
            AuthScheme::ApiKeyHeader => {
                let mut value = header::HeaderValue::from_str(&config.api_key)
                    .map_err(|_| ApolloError::Config("Invalid API key format".to_string()))?;
                value.set_sensitive(true);
                headers.insert(header::HeaderName::from_static("x-api-key"), value);
            }
            AuthScheme::Bearer => {
                let mut value =
                    header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                        .map_err(|_| ApolloError::Config("Invalid API key format".to_string()))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path under one of the API bases.
    fn build_url(&self, base: ApiBase, path: &str) -> ApolloResult<url::Url> {
        self.config
            .base(base)
            .join(path.trim_start_matches('/'))
            .map_err(ApolloError::InvalidUrl)
    }

    /// Send a request once. Non-success statuses become [`ApolloError::Api`].
    async fn execute(&self, request_builder: RequestBuilder) -> ApolloResult<Response> {
        match request_builder.send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                }

                let status = response.status().as_u16();
                let url = response.url().clone();
                let body = response.text().await.unwrap_or_default();
                let error = ApolloError::from_response(status, &body);
                warn!(status = status, url = %url, error = %error, "Apollo request failed");
                Err(error)
            }
            Err(e) => {
                warn!(error = %e, "Apollo request could not be sent");
                Err(e.into())
            }
        }
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, base: ApiBase, path: &str) -> ApolloResult<T> {
        let url = self.build_url(base, path)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request on a path made of raw segments.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `#` stay inside it.
    pub async fn get_segments<T: DeserializeOwned>(
        &self,
        base: ApiBase,
        segments: &[&str],
    ) -> ApolloResult<T> {
        let url = self.segments_url(base, segments)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    fn segments_url(&self, base: ApiBase, segments: &[&str]) -> ApolloResult<url::Url> {
        let mut url = self.config.base(base).clone();
        url.path_segments_mut()
            .map_err(|_| ApolloError::Config(format!("{} cannot be a base URL", self.config.base(base))))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        base: ApiBase,
        path: &str,
        query: &Q,
    ) -> ApolloResult<T> {
        let url = self.build_url(base, path)?;
        let pairs = query_pairs(query)?;
        debug!(url = %url, params = pairs.len(), "GET request with query");

        let response = self.execute(self.client.get(url).query(&pairs)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        base: ApiBase,
        path: &str,
        body: &B,
    ) -> ApolloResult<T> {
        let url = self.build_url(base, path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body)).await?;
        let body = response.json().await?;
        Ok(body)
    }
}

/// Flatten a query object into URL parameters.
///
/// Strings pass through, scalars are stringified, arrays repeat as `key[]`,
/// nulls are dropped and nested objects are sent as JSON text.
pub(crate) fn query_pairs<Q: Serialize>(query: &Q) -> ApolloResult<Vec<(String, String)>> {
    let map = match serde_json::to_value(query)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApolloError::InvalidInput(format!(
                "query parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let key = format!("{}[]", key);
                for item in items {
                    if let Some(item) = scalar_param(item) {
                        pairs.push((key.clone(), item));
                    }
                }
            }
            other => {
                if let Some(value) = scalar_param(other) {
                    pairs.push((key, value));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_param(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
