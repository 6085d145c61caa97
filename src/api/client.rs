//! QMS API Client
//!
//! [`ApiClient`] owns the HTTP transport and the immutable configuration, and
//! exposes the request primitive every resource operation funnels through.

use super::error::ClientError;
use super::http::{application_error, decode_success, sanitize_for_log};
use super::request::{merge_headers, Method, RequestOptions};
use crate::config::ClientConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

/// Async client for the QMS REST API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ClientConfig>,
    base_url: Arc<str>,
    root_url: Arc<str>,
    gate: Option<Arc<Semaphore>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("root_url", &self.root_url)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client from an explicit configuration
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        config.parsed_base_url()?;
        // Header names that differ only by case collapse to one entry
        config.default_headers = merge_headers(&BTreeMap::new(), &config.default_headers);
        let root_url = config.root_url()?;

        let mut builder = Client::builder().user_agent(concat!("qms-client/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        let gate = match config.max_concurrent_requests {
            Some(0) => anyhow::bail!("max_concurrent_requests must be at least 1"),
            Some(limit) => Some(Arc::new(Semaphore::new(limit))),
            None => None,
        };

        Ok(Self {
            http,
            base_url: Arc::from(config.trimmed_base_url()),
            root_url: Arc::from(root_url.as_str()),
            config: Arc::new(config),
            gate,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport root probed by [`crate::api::probe`]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Build the full URL for an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Perform one call against `endpoint` and decode the JSON response.
    ///
    /// Failures are logged once here and returned unchanged.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let method = options.effective_method();
        let url = self.url(endpoint);
        let span = tracing::debug_span!("api_request", request_id = %Uuid::new_v4(), %method, endpoint);

        async {
            self.dispatch(&url, options).await.inspect_err(|err| {
                tracing::error!("API request failed: {} {} ({}) - {}", method, endpoint, err.kind(), err);
            })
        }
        .instrument(span)
        .await
    }

    /// GET an endpoint
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(endpoint, RequestOptions::new()).await
    }

    /// Serialize `body` once and send it with `method`
    pub async fn send_json<B, T>(&self, method: Method, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body).map_err(|e| {
            let err = ClientError::encode(e);
            tracing::error!("API request failed: {} {} - {}", method, endpoint, err);
            err
        })?;
        self.request(endpoint, RequestOptions::new().method(method).body(body))
            .await
    }

    /// DELETE an endpoint
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(endpoint, RequestOptions::new().method(Method::Delete))
            .await
    }

    /// GET an absolute URL and return the raw 2xx body; no failure logging
    pub(crate) async fn get_absolute_text(&self, url: &str) -> Result<String, ClientError> {
        self.send(url, RequestOptions::new()).await.map(|(_, body)| body)
    }

    async fn dispatch<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T, ClientError> {
        let (status, body) = self.send(url, options).await?;
        decode_success(status, &body)
    }

    /// Send one request; non-2xx responses become application errors
    async fn send(&self, url: &str, options: RequestOptions) -> Result<(u16, String), ClientError> {
        let _permit = match &self.gate {
            Some(gate) => gate.acquire().await.ok(),
            None => None,
        };

        let method = options.effective_method();
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method.into(), url);
        for (name, value) in merge_headers(&self.config.default_headers, &options.headers) {
            request = request.header(name, value);
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(ClientError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::transport)?;

        if !status.is_success() {
            // Only log sanitized/truncated error body
            tracing::debug!("API error body: {} - {}", status, sanitize_for_log(&body));
            return Err(application_error(status.as_u16(), &body));
        }

        Ok((status.as_u16(), body))
    }
}
