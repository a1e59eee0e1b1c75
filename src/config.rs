// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration module - loads settings from environment variables and
//! command-line flags.

use alloy::primitives::Address;
use clap::Parser;
use std::str::FromStr;

use crate::analyzer::AnalyzerConfig;
use crate::dataset::DEFAULT_TOKEN_DECIMALS;
use crate::rpc::{BlockRange, ExplorerConfig};
use crate::validators::ScoringConfig;

const DEFAULT_API_URL: &str = "https://api.etherscan.io/api";

/// Flag wallets that look like pre-allocated insider recipients of a token.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "insider-scan", version)]
pub struct Cli {
    /// Token contract address (overrides CONTRACT_ADDRESS).
    pub contract: Option<String>,

    /// Seconds around deployment a wallet must have appeared in.
    #[arg(long)]
    pub window: Option<u64>,

    /// Decimals used to scale the total supply.
    #[arg(long)]
    pub supply_decimals: Option<u8>,

    /// Wallets profiled at once.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print findings as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Only run the suspicion scan.
    #[arg(long)]
    pub skip_overview: bool,
}

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Explorer
    pub api_url: String,
    pub api_key: String,
    pub chain_id: Option<u64>,

    // Target
    pub contract: Option<Address>,
    pub start_block: u64,
    pub end_block: u64,

    // Scoring
    pub time_window_secs: u64,
    pub supply_decimals: u8,
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let defaults = BlockRange::default();
        Ok(Self {
            // Explorer
            api_url: env_var_or("ETHERSCAN_API_URL", DEFAULT_API_URL),
            api_key: env_var("ETHERSCAN_API_KEY")?,
            chain_id: std::env::var("ETHERSCAN_CHAIN_ID")
                .ok()
                .map(|id| id.parse().map_err(|_| format!("Invalid ETHERSCAN_CHAIN_ID: {}", id)))
                .transpose()?,

            // Target
            contract: std::env::var("CONTRACT_ADDRESS")
                .ok()
                .map(|s| parse_address(&s))
                .transpose()?,
            start_block: env_var_or("START_BLOCK", &defaults.start.to_string())
                .parse()
                .unwrap_or(defaults.start),
            end_block: env_var_or("END_BLOCK", &defaults.end.to_string())
                .parse()
                .unwrap_or(defaults.end),

            // Scoring
            time_window_secs: env_var_or("TIME_WINDOW_SECS", "604800")
                .parse()
                .unwrap_or(604_800),
            supply_decimals: env_var_or("SUPPLY_DECIMALS", "18")
                .parse()
                .unwrap_or(DEFAULT_TOKEN_DECIMALS),
            concurrency: env_var_or("PROFILE_CONCURRENCY", "1").parse().unwrap_or(1),
        })
    }

    /// Apply command-line overrides.
    pub fn merge_cli(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(contract) = &cli.contract {
            self.contract = Some(parse_address(contract)?);
        }
        if let Some(window) = cli.window {
            self.time_window_secs = window;
        }
        if let Some(decimals) = cli.supply_decimals {
            self.supply_decimals = decimals;
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        Ok(self)
    }

    pub fn contract(&self) -> Result<Address, String> {
        self.contract
            .ok_or_else(|| "CONTRACT_ADDRESS not set and no contract given".to_string())
    }

    pub fn explorer(&self) -> ExplorerConfig {
        ExplorerConfig {
            base_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            chain_id: self.chain_id,
        }
    }

    pub fn analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            range: BlockRange {
                start: self.start_block,
                end: self.end_block,
            },
            scoring: ScoringConfig {
                time_window_secs: self.time_window_secs,
                ..ScoringConfig::default()
            },
            supply_decimals: self.supply_decimals,
            concurrency: self.concurrency.max(1),
        }
    }
}

fn env_var(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("{} not set", name))
}

fn env_var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|e| format!("Invalid address {}: {}", s, e))
}
