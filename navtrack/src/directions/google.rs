//! Google Directions API provider.
//!
//! # Endpoint
//!
//! `GET https://maps.googleapis.com/maps/api/directions/json`
//! with `origin`, `destination` (both `lat,lon`), `mode`, `language` and
//! `key` query parameters.
//!
//! Requires a Google Maps Platform API key with the Directions API enabled.

use tracing::debug;

use super::http::{AsyncHttpClient, ReqwestClient};
use super::types::{DirectionsRequest, DirectionsRoute, ProviderError};
use super::wire::parse_directions;
use super::{DirectionsConfig, DirectionsProvider};
use crate::BoxFuture;

/// Public Google Directions endpoint.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Google Directions provider.
///
/// # Example
///
/// ```no_run
/// use navtrack::directions::{GoogleDirectionsProvider, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = GoogleDirectionsProvider::new(client, "YOUR_API_KEY".to_string());
/// ```
pub struct GoogleDirectionsProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
}

impl<C: AsyncHttpClient> GoogleDirectionsProvider<C> {
    /// Creates a provider using the public endpoint.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
        }
    }

    /// Points the provider at a different endpoint (self-hosted proxy, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the request URL. Query values are percent-encoded.
    fn build_url(&self, request: &DirectionsRequest) -> Result<String, ProviderError> {
        let params = [
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", request.mode.as_query().to_string()),
            ("language", request.language.tag().to_string()),
            ("key", self.api_key.clone()),
        ];

        reqwest::Url::parse_with_params(&self.base_url, &params)
            .map(String::from)
            .map_err(|e| ProviderError::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))
    }
}

impl GoogleDirectionsProvider<ReqwestClient> {
    /// Creates a provider with a reqwest client configured from `config`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Config`] if no API key is configured or the proxy
    /// URL is invalid.
    pub fn from_config(config: &DirectionsConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::Config("no API key configured".to_string()))?;

        let client = ReqwestClient::with_options(config.timeout, config.proxy.as_deref())?;
        Ok(Self::new(client, api_key).with_base_url(config.base_url.clone()))
    }
}

impl<C: AsyncHttpClient> DirectionsProvider for GoogleDirectionsProvider<C> {
    fn fetch_route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> BoxFuture<'a, Result<DirectionsRoute, ProviderError>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return Err(ProviderError::Config("no API key configured".to_string()));
            }

            let url = self.build_url(request)?;
            debug!(
                origin = %request.origin,
                destination = %request.destination,
                mode = request.mode.as_query(),
                "Requesting directions"
            );

            let body = self.http_client.get(&url).await?;
            let route = parse_directions(&body)?;

            debug!(
                steps = route.steps.len(),
                distance_m = route.distance_m,
                "Directions received"
            );
            Ok(route)
        })
    }

    fn name(&self) -> &str {
        "Google Directions"
    }
}
