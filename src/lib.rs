//! Etherscan contract fetcher
//!
//! Reads a list of contract addresses and queries an Etherscan-compatible
//! explorer for each of them, one request at a time with a fixed pause between
//! calls. Two runs are provided:
//!
//! - [`check_proxy_addresses`] fetches each ABI and lists the contracts that
//!   declare the `ProxyUpdated(address,address)` or `Upgraded(address)` event.
//! - [`fetch_contract_sources`] downloads verified sources, ABI, compiler
//!   version and the raw explorer record into one directory per contract.
//!
//! # Example
//!
//! ```rust,no_run
//! use etherscan_fetcher::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let client = EtherscanClient::new(&config)?;
//!
//!     let summary = check_proxy_addresses(&config, &client).await?;
//!     println!("{} proxy events found", summary.matches);
//!
//!     Ok(())
//! }
//! ```

pub mod addresses;
pub mod client;
pub mod config;
pub mod error;
pub mod event_matcher;
pub mod pipeline;
pub mod source_processor;
pub mod types;

pub use addresses::AddressReader;
pub use client::EtherscanClient;
pub use config::{Config, ErrorPolicy, EtherscanConfig, PathsConfig, ServiceConfig};
pub use error::{FetcherError, Result};
pub use event_matcher::{find_upgrade_events, parse_abi, EventMatch, EventRule, UPGRADE_EVENT_RULES};
pub use pipeline::{check_proxy_addresses, fetch_contract_sources, FailedAddress, RunSummary};
pub use source_processor::{process_source_result, SourceBundle, SourceOutcome};
pub use types::{AbiEntry, AbiParam, SourceResult};
