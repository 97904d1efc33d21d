//! Marketplace persistence client.
//!
//! Two operations against the external backend: store a launched-token record
//! and list what has been launched. There is no pagination and no conflict
//! resolution beyond the orchestrator's own pre-check; concurrent launchers
//! racing the same symbol are not guarded here.

use crate::error::LaunchError;
use crate::types::LaunchedToken;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

/// Persistence seam the orchestrator runs against. `MarketplaceClient` is the
/// HTTP implementation; tests substitute an in-memory store.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Persist a launched-token record. Uniqueness on `symbol` is enforced by
    /// the backend.
    async fn store_launched(&self, record: &LaunchedToken) -> Result<LaunchedToken, LaunchError>;

    /// All launched-token records.
    async fn fetch_launched(&self) -> Result<Vec<LaunchedToken>, LaunchError>;

    /// A single record by symbol, or `None` if the symbol is unknown.
    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<LaunchedToken>, LaunchError>;
}

/// HTTP client for the marketplace backend.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http_client: Client,
    base_url: String,
}

impl MarketplaceClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/marketplace/{}", self.base_url, path)
    }
}

#[async_trait]
impl MarketplaceStore for MarketplaceClient {
    #[instrument(skip(self, record), fields(symbol = %record.symbol))]
    async fn store_launched(&self, record: &LaunchedToken) -> Result<LaunchedToken, LaunchError> {
        let response = self
            .http_client
            .post(self.api("launch"))
            .json(record)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchError::Marketplace(format!(
                "store returned {}: {}",
                status, body
            )));
        }
        let stored = response.json().await?;
        debug!("stored launched token {}", record.symbol);
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn fetch_launched(&self) -> Result<Vec<LaunchedToken>, LaunchError> {
        let response = self.http_client.get(self.api("launched")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchError::Marketplace(format!(
                "list returned {}: {}",
                status, body
            )));
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<LaunchedToken>, LaunchError> {
        let response = self
            .http_client
            .get(self.api(&format!("launched/{}", symbol)))
            .send()
            .await?;
        // Any non-2xx (including 404) means "no such record"; the backend
        // answers null for unknown symbols too.
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(response.json().await?)
    }
}
