// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end contract analysis.
//!
//! Ties the resolver, profiler and scorer together over one [`ChainClient`].
//! Nothing here prints; see [`crate::report`] for presentation.

use alloy::primitives::Address;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, DEFAULT_TOKEN_DECIMALS};
use crate::error::ProviderError;
use crate::rpc::{BlockRange, ChainClient, Fetched, Transport};
use crate::validators::{
    ContractContext, ContractResolver, InsiderScorer, MissingPrerequisite, Resolution,
    ScanOutcome, ScoringConfig, Verdict, WalletProfile, WalletProfiler,
};

/// Analyzer settings.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub range: BlockRange,
    pub scoring: ScoringConfig,
    /// Decimals used to scale the total supply (default: 18).
    pub supply_decimals: u8,
    /// Wallets profiled at once (default: 1, strictly sequential).
    pub concurrency: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            range: BlockRange::default(),
            scoring: ScoringConfig::default(),
            supply_decimals: DEFAULT_TOKEN_DECIMALS,
            concurrency: 1,
        }
    }
}

/// Activity counts of one token recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientActivity {
    pub wallet: Address,
    pub native_txs: usize,
    pub token_txs: usize,
    /// Set when either history failed to fetch; the counts are then partial.
    pub fetch_error: Option<String>,
}

fn fetch_error(profile: &WalletProfile) -> Option<String> {
    [&profile.native, &profile.tokens]
        .into_iter()
        .find_map(|fetched| match fetched {
            Fetched::Failed { message } => Some(message.clone()),
            _ => None,
        })
}

pub struct ContractAnalyzer<T> {
    client: ChainClient<T>,
    resolver: ContractResolver,
    scorer: InsiderScorer,
    config: AnalyzerConfig,
}

impl<T: Transport> ContractAnalyzer<T> {
    pub fn new(client: ChainClient<T>, contract: Address, config: AnalyzerConfig) -> Self {
        Self {
            client,
            resolver: ContractResolver::new(contract, config.supply_decimals),
            scorer: InsiderScorer::new(config.scoring.clone()),
            config,
        }
    }

    pub fn context(&self) -> &ContractContext {
        self.resolver.context()
    }

    pub fn client(&self) -> &ChainClient<T> {
        &self.client
    }

    fn profiler(&self) -> WalletProfiler<'_, T> {
        WalletProfiler::new(&self.client, self.context().contract, self.config.range)
    }

    /// Incoming native transfers to the deployer.
    ///
    /// Also pins the deployment timestamp when the creation transaction is
    /// among them.
    pub async fn analyze_funding_transactions(
        &mut self,
    ) -> Result<Resolution<Fetched<Dataset>>, ProviderError> {
        let deployer = match self.resolver.resolve_creation(&self.client).await? {
            Resolution::Resolved((deployer, _)) => deployer,
            Resolution::Unresolved(reason) => {
                warn!("⚠️ Deployer unknown: {:?}", reason);
                return Ok(Resolution::Unresolved(reason));
            }
        };

        let history = self.profiler().native_transactions(deployer).await?;
        let funding = history.map(|txs| txs.incoming(deployer));

        if let Fetched::Data(funding) = &funding {
            info!("💸 {} funding transactions to deployer", funding.len());
            if let Resolution::Resolved(ts) = self.resolver.resolve_deployment_timestamp(funding) {
                info!("⏱️ Deployment timestamp: {}", ts);
            }
        }

        Ok(Resolution::Resolved(funding))
    }

    /// Every transfer of the contract's token.
    pub async fn analyze_token_distribution(&mut self) -> Result<Fetched<Dataset>, ProviderError> {
        let transfers = self.profiler().token_transfers(None).await?;
        if let Some(decimals) = transfers.as_ref().data().and_then(Dataset::decimals) {
            self.resolver.note_transfer_decimals(decimals);
        }
        if let Fetched::Data(transfers) = &transfers {
            info!("📦 {} token transfers", transfers.len());
        }
        Ok(transfers)
    }

    /// Native and token tx counts of every unique recipient.
    ///
    /// Keeps the state of the transfer fetch: a failed list is not an
    /// empty one.
    pub async fn analyze_recipient_wallets(
        &mut self,
    ) -> Result<Fetched<Vec<RecipientActivity>>, ProviderError> {
        let recipients = match self.analyze_token_distribution().await? {
            Fetched::Data(transfers) => transfers.recipients(),
            Fetched::Empty => return Ok(Fetched::Empty),
            Fetched::Failed { message } => return Ok(Fetched::Failed { message }),
        };
        let profiles = self.profile_all(recipients).await?;

        Ok(Fetched::Data(
            profiles
                .iter()
                .map(|p| RecipientActivity {
                    wallet: p.wallet,
                    native_txs: p.native_txs().len(),
                    token_txs: p.token_txs().len(),
                    fetch_error: fetch_error(p),
                })
                .collect(),
        ))
    }

    /// Score every unique token recipient.
    ///
    /// Without a total supply or deployment timestamp the scan is skipped
    /// rather than failed.
    pub async fn find_suspicious_wallets(&mut self) -> Result<ScanOutcome, ProviderError> {
        self.resolver.resolve_supply(&self.client).await?;
        if self.context().creation_timestamp.is_none() {
            self.analyze_funding_transactions().await?;
        }

        let total_supply = match self.context().total_supply {
            Some(supply) if supply > 0.0 => supply,
            _ => {
                warn!("⏭️ Skipping scan: total supply unknown");
                return Ok(ScanOutcome::Skipped(MissingPrerequisite::TotalSupply));
            }
        };
        let Some(deployed_at) = self.context().creation_timestamp else {
            warn!("⏭️ Skipping scan: deployment timestamp unknown");
            return Ok(ScanOutcome::Skipped(MissingPrerequisite::DeploymentTimestamp));
        };

        let recipients = match self.analyze_token_distribution().await? {
            Fetched::Data(transfers) => transfers.recipients(),
            Fetched::Empty => Vec::new(),
            Fetched::Failed { message } => {
                warn!("⚠️ Scan incomplete: token transfers unavailable ({})", message);
                return Ok(ScanOutcome::Incomplete { message });
            }
        };
        info!("🔍 Scoring {} recipients", recipients.len());

        let profiles = self.profile_all(recipients).await?;
        let mut findings = Vec::new();
        let mut unscored = Vec::new();
        for profile in &profiles {
            match self.scorer.score(profile, deployed_at, total_supply) {
                Verdict::Suspicious(finding) => {
                    info!(
                        "🚨 Suspicious: {:?} got {:.2} tokens ({:.2}%)",
                        finding.wallet, finding.token_amount, finding.percentage
                    );
                    findings.push(finding);
                }
                Verdict::FetchFailed { message } => {
                    warn!("⚠️ Wallet {:?} not scored: {}", profile.wallet, message);
                    unscored.push(profile.wallet);
                }
                verdict => debug!("Wallet {:?}: {:?}", profile.wallet, verdict),
            }
        }

        Ok(ScanOutcome::Scanned { findings, unscored })
    }

    /// Profile wallets, at most `concurrency` in flight. Output keeps input order.
    async fn profile_all(&self, wallets: Vec<Address>) -> Result<Vec<WalletProfile>, ProviderError> {
        let profiler = self.profiler();
        stream::iter(wallets)
            .map(|wallet| async move { profiler.profile(wallet).await })
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await
    }
}
