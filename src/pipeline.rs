//! The two address-driven runs: proxy detection and source download
//!
//! Both walk the address list strictly in order, one upstream call per address,
//! and by default stop at the first failing address. With
//! [`ErrorPolicy::Skip`] the failure is logged, recorded in the summary, and
//! the run moves on.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::addresses::AddressReader;
use crate::client::EtherscanClient;
use crate::config::{Config, ErrorPolicy};
use crate::error::{FetcherError, Result};
use crate::event_matcher::{find_upgrade_events, parse_abi, write_matches};
use crate::source_processor::{process_source_result, SourceOutcome};

#[derive(Debug, Clone)]
pub struct FailedAddress {
    /// Position in the input list, 0-based
    pub ordinal: usize,
    pub address: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub addresses: usize,
    /// Lines appended to the proxy list
    pub matches: usize,
    /// Source results written to disk
    pub written: usize,
    /// Source results without verified code
    pub skipped: usize,
    pub failed: Vec<FailedAddress>,
}

impl RunSummary {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            addresses: 0,
            matches: 0,
            written: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }

    fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }

    fn record_failure(
        &mut self,
        policy: ErrorPolicy,
        ordinal: usize,
        address: &str,
        err: FetcherError,
    ) -> Result<()> {
        match policy {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Skip => {
                error!("Failed to process contract {} (#{}): {}", address, ordinal, err);
                self.failed.push(FailedAddress {
                    ordinal,
                    address: address.to_string(),
                    error: err.to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Writes every address whose ABI declares `ProxyUpdated(address,address)` or
/// `Upgraded(address)` to the output file, once per matching event.
pub async fn check_proxy_addresses(config: &Config, client: &EtherscanClient) -> Result<RunSummary> {
    let input_path = config.input_path();
    let output_path = config.output_file_path()?;

    let addresses = AddressReader::open(&input_path)?;
    let mut out = BufWriter::new(File::create(&output_path)?);
    info!("Checking contracts from {:?}, writing proxies to {:?}", input_path, output_path);

    let mut summary = RunSummary::start();

    for (ordinal, address) in addresses.enumerate() {
        let address = address?;
        summary.addresses += 1;
        info!("Checking ABI of {} (#{})", address, ordinal);

        match check_address(client, &mut out, &address).await {
            Ok(matches) => summary.matches += matches,
            Err(e) => summary.record_failure(config.service.on_error, ordinal, &address, e)?,
        }
    }

    let summary = summary.finish();
    info!(
        "Checked {} contracts: {} proxy events matched, {} failed",
        summary.addresses,
        summary.matches,
        summary.failed.len()
    );
    Ok(summary)
}

async fn check_address(client: &EtherscanClient, out: &mut BufWriter<File>, address: &str) -> Result<usize> {
    let raw_abi = client.fetch_abi(address).await?;
    let abi = parse_abi(&raw_abi)?;

    let matches = find_upgrade_events(&abi);
    if matches.is_empty() {
        debug!("No upgrade events in ABI of {}", address);
    }
    write_matches(out, address, &matches)?;

    Ok(matches.len())
}

/// Downloads verified sources into `<output_dir>/<address>/`.
pub async fn fetch_contract_sources(config: &Config, client: &EtherscanClient) -> Result<RunSummary> {
    let input_path = config.input_path();
    let output_root = config.output_dir_path()?;

    let addresses = AddressReader::open(&input_path)?;
    info!("Fetching sources for contracts from {:?} into {:?}", input_path, output_root);

    let mut summary = RunSummary::start();

    for (ordinal, address) in addresses.enumerate() {
        let address = address?;
        summary.addresses += 1;
        info!("Fetching source code of {} (#{})", address, ordinal);

        if let Err(e) = store_sources(client, &address, &output_root, &mut summary).await {
            summary.record_failure(config.service.on_error, ordinal, &address, e)?;
        }
    }

    let summary = summary.finish();
    info!(
        "Fetched {} contracts: {} results written, {} unverified, {} failed",
        summary.addresses,
        summary.written,
        summary.skipped,
        summary.failed.len()
    );
    Ok(summary)
}

async fn store_sources(
    client: &EtherscanClient,
    address: &str,
    output_root: &Path,
    summary: &mut RunSummary,
) -> Result<()> {
    let results = client.fetch_source_bundle(address).await?;

    // File names use the position within this address's results only
    for (index, result) in results.iter().enumerate() {
        match process_source_result(result, address, output_root, index)? {
            SourceOutcome::Written { .. } => summary.written += 1,
            SourceOutcome::Skipped => summary.skipped += 1,
        }
    }

    Ok(())
}
