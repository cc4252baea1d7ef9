//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;
use crate::BoxFuture;

/// Default request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Async HTTP GET.
///
/// Lets providers be exercised against canned responses in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the body.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ProviderError>>;
}

/// HTTP client built on reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a client with the default timeout and no proxy.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_options(DEFAULT_HTTP_TIMEOUT, None)
    }

    /// Creates a client with a custom timeout and optional proxy URL.
    ///
    /// The proxy, when given, is used for all schemes.
    pub fn with_options(timeout: Duration, proxy: Option<&str>) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("navtrack/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ProviderError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, timeout })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ProviderError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::HttpError(format!("Request failed: {}", e))
                }
            })?;

            // Check HTTP status
            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::HttpError(format!("HTTP {}", status)));
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_without_proxy() {
        assert!(ReqwestClient::new().is_ok());
    }

    #[test]
    fn test_client_builds_with_proxy() {
        let client = ReqwestClient::with_options(
            Duration::from_secs(5),
            Some("http://127.0.0.1:7890"),
        );
        assert!(client.is_ok());
    }
}
