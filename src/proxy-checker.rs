use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use etherscan_fetcher::{check_proxy_addresses, Config, EtherscanClient};

#[derive(Parser, Debug)]
#[command(name = "proxy-checker")]
#[command(about = "List contracts whose ABI declares proxy upgrade events", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML or YAML)
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first, it carries the default log level
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {:?}", args.config))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    info!("Loaded configuration from {:?}", args.config);
    info!("Explorer API: {}", config.etherscan.api_url);

    let client = EtherscanClient::new(&config)
        .context("Failed to create explorer client")?;

    let summary = match check_proxy_addresses(&config, &client).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Proxy check aborted: {}", e);
            return Err(e).context("Proxy check failed");
        }
    };

    for failed in &summary.failed {
        info!("Skipped {} (#{}): {}", failed.address, failed.ordinal, failed.error);
    }
    if let Some(elapsed) = summary.elapsed() {
        info!("Finished in {}s", elapsed.num_seconds());
    }

    Ok(())
}
