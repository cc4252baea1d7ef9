//! Directions service client.
//!
//! A [`DirectionsProvider`] turns a [`DirectionsRequest`] into the first leg
//! of the first route the service suggests. The Google implementation talks
//! HTTP through an [`AsyncHttpClient`] so it can be exercised offline.
//!
//! ```ignore
//! use navtrack::directions::{DirectionsConfig, GoogleDirectionsProvider};
//!
//! let config = DirectionsConfig::default().with_api_key(key);
//! let provider = GoogleDirectionsProvider::from_config(&config)?;
//! let route = provider.fetch_route(&request).await?;
//! ```

mod google;
mod http;
mod types;
mod wire;

pub use google::{GoogleDirectionsProvider, DEFAULT_DIRECTIONS_URL};
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_HTTP_TIMEOUT};
pub use types::{DirectionsRequest, DirectionsRoute, DirectionsStep, ProviderError};
pub use wire::parse_directions;

use std::time::Duration;

use crate::BoxFuture;

/// Source of routes.
pub trait DirectionsProvider: Send + Sync {
    /// Fetches a route for `request`.
    fn fetch_route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> BoxFuture<'a, Result<DirectionsRoute, ProviderError>>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

/// Fetches a route, failing with [`ProviderError::Timeout`] after `timeout`.
pub async fn fetch_with_timeout(
    provider: &dyn DirectionsProvider,
    request: &DirectionsRequest,
    timeout: Duration,
) -> Result<DirectionsRoute, ProviderError> {
    match tokio::time::timeout(timeout, provider.fetch_route(request)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

/// Transport settings for the directions provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsConfig {
    /// Service endpoint.
    pub base_url: String,
    /// API key; requests fail without one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Optional HTTP(S) proxy URL.
    pub proxy: Option<String>,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
            proxy: None,
        }
    }
}

impl DirectionsConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}
