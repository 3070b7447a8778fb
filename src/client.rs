//! Etherscan-compatible explorer client
//!
//! Each call is a single GET against the configured endpoint, followed by a
//! fixed pause of `1 / requests_per_second`. There are no retries: any failure
//! surfaces as [`FetcherError::Upstream`].

use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{FetcherError, Result};
use crate::types::{EtherscanResponse, SourceResult};

pub struct EtherscanClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    chain_id: Option<u64>,
    request_period: Duration,
}

impl EtherscanClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetcherError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.etherscan.api_url.trim_end_matches('/').to_string(),
            api_key: config.etherscan.api_key.clone(),
            chain_id: config.chain_id(),
            request_period: config.request_period(),
        })
    }

    pub fn request_period(&self) -> Duration {
        self.request_period
    }

    /// Raw ABI JSON text of a verified contract
    pub async fn fetch_abi(&self, address: &str) -> Result<String> {
        let result = self.call("getabi", address).await?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FetcherError::Upstream(format!("ABI result for {} is not a string", address)))
    }

    /// Verified source entries; an unverified contract yields entries with empty `SourceCode`
    pub async fn fetch_source_bundle(&self, address: &str) -> Result<Vec<SourceResult>> {
        let result = self.call("getsourcecode", address).await?;

        serde_json::from_value(result).map_err(|e| {
            FetcherError::Upstream(format!("Failed to parse source code result for {}: {}", address, e))
        })
    }

    async fn call(&self, action: &str, address: &str) -> Result<Value> {
        let result = self.request(action, address).await;

        trace!("Pausing {:?} after {} request", self.request_period, action);
        sleep(self.request_period).await;

        result
    }

    async fn request(&self, action: &str, address: &str) -> Result<Value> {
        let mut query = vec![
            ("module", "contract".to_string()),
            ("action", action.to_string()),
            ("address", address.to_string()),
        ];
        if let Some(chain_id) = self.chain_id {
            query.push(("chainid", chain_id.to_string()));
        }

        debug!("GET {} action={} address={} chainid={:?}", self.api_url, action, address, self.chain_id);

        query.push(("apikey", self.api_key.clone()));

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetcherError::Upstream(format!("Request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(FetcherError::Upstream(format!("HTTP error: {}", response.status())));
        }

        let envelope: EtherscanResponse = response
            .json()
            .await
            .map_err(|e| FetcherError::Upstream(format!("Failed to parse response: {}", e.without_url())))?;

        if envelope.status != "1" {
            let detail = envelope.result.as_str().unwrap_or("Unknown error");
            return Err(FetcherError::Upstream(format!("{}: {}", envelope.message, detail)));
        }

        Ok(envelope.result)
    }
}
