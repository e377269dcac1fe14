//! HTTP side config adapter
//!
//! Fetches a remote's side config with a plain GET and parses the JSON body.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::SideConfig;
use tracing::debug;
use url::Url;

use crate::error::{RegistryConfigError, SideConfigError};
use crate::ports::SideConfigFetcher;

/// Default request timeout for side config fetches.
pub const DEFAULT_SIDE_CONFIG_TIMEOUT: Duration = Duration::from_secs(10);

/// `SideConfigFetcher` over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSideConfigFetcher {
    client: reqwest::Client,
}

impl HttpSideConfigFetcher {
    /// Build with a request timeout.
    pub fn new(timeout: Duration) -> Result<Self, RegistryConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Reuse an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SideConfigFetcher for HttpSideConfigFetcher {
    async fn fetch(&self, url: &Url) -> Result<SideConfig, SideConfigError> {
        debug!(url = %url, "Fetching side config");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SideConfigError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SideConfigError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SideConfigError::Http(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| SideConfigError::Parse(e.to_string()))
    }
}

/// Fetcher for registries that never fetch side configs.
///
/// Any fetch fails, which the container downgrades to "no config".
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSideConfigFetcher;

#[async_trait]
impl SideConfigFetcher for NoSideConfigFetcher {
    async fn fetch(&self, url: &Url) -> Result<SideConfig, SideConfigError> {
        Err(SideConfigError::Unavailable {
            url: url.to_string(),
        })
    }
}
