use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use super::types::ProductListing;

/// Production packaging endpoint.
pub const DEFAULT_API_URL: &str = "https://displaycatalog.mp.microsoft.com/v7.0";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Fetch the packaging listing for a product.
    async fn packages(&self, product_id: &str) -> Result<ProductListing>;
    fn api_url(&self) -> &str;
}

/// Store backend client. Performs a single query per call with no retries;
/// a failed attempt surfaces immediately.
pub struct StoreClient {
    api_url: String,
    timeout: Duration,
}

impl StoreClient {
    #[tracing::instrument(skip(api_url))]
    pub fn new(api_url: Option<String>, timeout: Duration) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { api_url, timeout }
    }
}

#[async_trait]
impl StoreBackend for StoreClient {
    #[tracing::instrument(skip(self))]
    async fn packages(&self, product_id: &str) -> Result<ProductListing> {
        let url = format!("{}/products/{}/packages", self.api_url, product_id);

        debug!("Fetching packaging listing from {}...", url);

        // Scoped to this call; dropping it releases every connection.
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to the store backend")?;

        let response = response
            .error_for_status()
            .context("Store backend rejected the packaging query")?;

        let listing = response
            .json::<ProductListing>()
            .await
            .context("Failed to parse packaging listing from the store backend")?;

        Ok(listing)
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }
}
