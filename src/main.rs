// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Insider Scan - flag pre-allocated insider wallets of a token launch

use anyhow::anyhow;
use clap::Parser;
use insider_scan::config::{Cli, Config};
use insider_scan::report;
use insider_scan::rpc::{ChainClient, Fetched, HttpTransport};
use insider_scan::validators::Resolution;
use insider_scan::ContractAnalyzer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_env()
        .and_then(|c| c.merge_cli(&cli))
        .map_err(|e| {
            error!("Failed to load config: {}", e);
            anyhow!(e)
        })?;
    let contract = config.contract().map_err(|e| anyhow!(e))?;

    info!("🚀 Insider scan starting...");
    info!("📡 Explorer: {}", config.api_url);
    info!("📜 Contract: {:?}", contract);
    info!("⏱️ Window: {}s", config.time_window_secs);

    let client = ChainClient::new(HttpTransport::new(config.explorer()));
    let mut analyzer = ContractAnalyzer::new(client, contract, config.analyzer());

    if !cli.skip_overview {
        match analyzer.analyze_funding_transactions().await? {
            Resolution::Resolved(Fetched::Data(funding)) if !funding.is_empty() => {
                println!("{}", report::funding_table(&funding));
            }
            Resolution::Resolved(_) => info!("No funding transactions to deployer"),
            Resolution::Unresolved(reason) => warn!("Funding analysis skipped: {:?}", reason),
        }

        if let Fetched::Data(transfers) = analyzer.analyze_token_distribution().await? {
            println!("{}", report::distribution_table(&transfers));
        }

        match analyzer.analyze_recipient_wallets().await? {
            Fetched::Data(activity) => println!("{}", report::activity_table(&activity)),
            Fetched::Empty => info!("No token recipients"),
            Fetched::Failed { message } => warn!("Recipient activity skipped: {}", message),
        }
    }

    let outcome = analyzer.find_suspicious_wallets().await?;

    if cli.json {
        println!("{}", report::findings_json(outcome.findings())?);
    } else {
        println!("{}", report::context_summary(analyzer.context()));
        println!("{}", report::scan_summary(&outcome));
    }

    info!("✅ Done: {} suspicious wallets", outcome.findings().len());
    Ok(())
}
