// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Insider allocation heuristics.
//!
//! A token recipient is flagged when its wallet appeared close to the
//! deployment, it received a "round" amount, and it has barely been used.
//! The round-amount test is deliberately loose: any percentage within the
//! tolerance of a whole number qualifies, including 0%.

use alloy::primitives::Address;
use serde::Serialize;

use super::profiler::WalletProfile;
use crate::rpc::Fetched;

/// Scoring thresholds.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Max distance between wallet creation and deployment (default: 7 days).
    pub time_window_secs: u64,
    /// Token amount that counts as round on its own (default: 1,000,000).
    pub round_amount_min: f64,
    /// Distance from a whole percentage that still counts as round (default: 0.1).
    pub percent_tolerance: f64,
    /// Native tx count must be below this (default: 5).
    pub max_native_txs: usize,
    /// Token tx count must be below this (default: 3).
    pub max_token_txs: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            time_window_secs: 7 * 86_400,
            round_amount_min: 1_000_000.0,
            percent_tolerance: 0.1,
            max_native_txs: 5,
            max_token_txs: 3,
        }
    }
}

/// A wallet flagged as a likely insider allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub wallet: Address,
    pub token_amount: f64,
    /// Share of total supply, in percent.
    pub percentage: f64,
    pub tx_count: usize,
    /// `%Y-%m-%d %H:%M:%S`, UTC.
    pub creation_time: String,
    pub creation_timestamp: u64,
}

/// Result of scoring one wallet.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Suspicious(Finding),
    Clean { round: bool, low_activity: bool },
    /// No native history, so no creation time.
    NoHistory,
    OutsideWindow { delta_secs: u64 },
    /// A history fetch failed; the wallet cannot be judged.
    FetchFailed { message: String },
}

/// Context data the scan cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPrerequisite {
    TotalSupply,
    DeploymentTimestamp,
}

/// Result of a whole suspicion scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The scan did not run.
    Skipped(MissingPrerequisite),
    /// The token transfer list could not be fetched.
    Incomplete { message: String },
    /// The scan ran. Findings are in recipient order, possibly none;
    /// `unscored` lists recipients whose histories failed to fetch.
    Scanned {
        findings: Vec<Finding>,
        unscored: Vec<Address>,
    },
}

impl ScanOutcome {
    pub fn findings(&self) -> &[Finding] {
        match self {
            ScanOutcome::Scanned { findings, .. } => findings,
            _ => &[],
        }
    }

    pub fn unscored(&self) -> &[Address] {
        match self {
            ScanOutcome::Scanned { unscored, .. } => unscored,
            _ => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScanOutcome::Skipped(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsiderScorer {
    config: ScoringConfig,
}

impl InsiderScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn is_round_amount(&self, token_amount: f64, percentage: f64) -> bool {
        let tolerance = self.config.percent_tolerance;
        token_amount >= self.config.round_amount_min
            || (percentage - 1.0).abs() < tolerance
            || (percentage - percentage.round()).abs() < tolerance
    }

    /// Counts cover the wallet's entire history.
    pub fn is_low_activity(&self, native_txs: usize, token_txs: usize) -> bool {
        native_txs < self.config.max_native_txs && token_txs < self.config.max_token_txs
    }

    pub fn score(&self, profile: &WalletProfile, deployed_at: u64, total_supply: f64) -> Verdict {
        for fetched in [&profile.native, &profile.tokens] {
            if let Fetched::Failed { message } = fetched {
                return Verdict::FetchFailed {
                    message: message.clone(),
                };
            }
        }

        let Some(first_seen) = profile.first_seen() else {
            return Verdict::NoHistory;
        };

        let delta_secs = first_seen.timestamp.abs_diff(deployed_at);
        if delta_secs > self.config.time_window_secs {
            return Verdict::OutsideWindow { delta_secs };
        }

        let token_amount = profile.token_txs().total_received(profile.wallet);
        let percentage = token_amount / total_supply * 100.0;
        let native_count = profile.native_txs().len();

        let round = self.is_round_amount(token_amount, percentage);
        let low_activity = self.is_low_activity(native_count, profile.token_txs().len());
        if !(round && low_activity) {
            return Verdict::Clean {
                round,
                low_activity,
            };
        }

        Verdict::Suspicious(Finding {
            wallet: profile.wallet,
            token_amount,
            percentage,
            tx_count: native_count,
            creation_time: format_timestamp(first_seen.timestamp),
            creation_timestamp: first_seen.timestamp,
        })
    }
}

pub fn format_timestamp(timestamp: u64) -> String {
    chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use serde_json::json;

    const WALLET: &str = "0x00000000000000000000000000000000000000aa";
    const OTHER: &str = "0x00000000000000000000000000000000000000bb";
    const T0: u64 = 1_700_000_000;

    fn rows(n: usize, start_ts: u64, to: &str, value: &str) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                json!({
                    "hash": format!("0x{:064x}", start_ts + i as u64),
                    "from": "0x00000000000000000000000000000000000000f0",
                    "to": to,
                    "value": value,
                    "timeStamp": (start_ts + i as u64 * 60).to_string(),
                    "blockNumber": (18_000_000 + i).to_string(),
                    "tokenDecimal": "18"
                })
            })
            .collect()
    }

    fn dataset(rows: Vec<serde_json::Value>) -> Fetched<Dataset> {
        if rows.is_empty() {
            return Fetched::Empty;
        }
        let raw = serde_json::from_value(serde_json::Value::Array(rows)).unwrap();
        Fetched::Data(Dataset::tokens(raw).unwrap())
    }

    fn profile(native: usize, created: u64, tokens: Vec<serde_json::Value>) -> WalletProfile {
        WalletProfile {
            wallet: WALLET.parse().unwrap(),
            native: dataset(rows(native, created, WALLET, "0")),
            tokens: dataset(tokens),
        }
    }

    fn tokens(amount_major: u64) -> serde_json::Value {
        let mut row = rows(1, T0 + 7_200, WALLET, "0").remove(0);
        row["value"] = json!(format!("{}000000000000000000", amount_major));
        row
    }

    #[test]
    fn round_amount_predicate() {
        let scorer = InsiderScorer::default();
        // absolute threshold
        assert!(scorer.is_round_amount(1_000_000.0, 0.37));
        // near 1%
        assert!(scorer.is_round_amount(500.0, 0.95));
        // near any whole percent
        assert!(scorer.is_round_amount(500.0, 1.05));
        assert!(scorer.is_round_amount(500.0, 2.04));
        assert!(scorer.is_round_amount(1.0, 0.0));
        // nowhere near
        assert!(!scorer.is_round_amount(850_000.0, 0.85));
        assert!(!scorer.is_round_amount(999_999.0, 1.15));
        assert!(!scorer.is_round_amount(500.0, 2.5));
    }

    #[test]
    fn low_activity_bounds_are_strict() {
        let scorer = InsiderScorer::default();
        assert!(scorer.is_low_activity(4, 2));
        assert!(!scorer.is_low_activity(5, 0));
        assert!(!scorer.is_low_activity(0, 3));
    }

    #[test]
    fn flags_round_quiet_wallet_near_deployment() {
        let scorer = InsiderScorer::default();
        let p = profile(2, T0 + 3_600, vec![tokens(10_000_000)]);

        match scorer.score(&p, T0, 1_000_000_000.0) {
            Verdict::Suspicious(finding) => {
                assert_eq!(finding.wallet, WALLET.parse::<Address>().unwrap());
                assert!((finding.percentage - 1.0).abs() < 1e-9);
                assert!((finding.token_amount - 10_000_000.0).abs() < 1e-6);
                assert_eq!(finding.tx_count, 2);
                assert_eq!(finding.creation_timestamp, T0 + 3_600);
                assert_eq!(finding.creation_time, "2023-11-14 23:13:20");
            }
            other => panic!("expected suspicious, got {:?}", other),
        }
    }

    #[test]
    fn wallet_without_native_history_is_never_flagged() {
        let scorer = InsiderScorer::default();
        let p = profile(0, T0, vec![tokens(50_000_000)]);
        assert_eq!(scorer.score(&p, T0, 1_000_000_000.0), Verdict::NoHistory);
    }

    #[test]
    fn wallet_outside_window_is_never_flagged() {
        let scorer = InsiderScorer::default();
        let p = profile(1, T0 + 604_801, vec![tokens(10_000_000)]);
        assert_eq!(
            scorer.score(&p, T0, 1_000_000_000.0),
            Verdict::OutsideWindow { delta_secs: 604_801 }
        );

        let edge = profile(1, T0 - 604_800, vec![tokens(10_000_000)]);
        assert!(matches!(scorer.score(&edge, T0, 1_000_000_000.0), Verdict::Suspicious(_)));
    }

    #[test]
    fn only_transfers_to_the_wallet_count() {
        let scorer = InsiderScorer::default();
        let mut outgoing = tokens(10_000_000);
        outgoing["to"] = json!(OTHER);
        let p = profile(1, T0, vec![tokens(12_345), outgoing]);

        // 12,345 of 1B is ~0.0012%, which rounds to 0% and so still counts as round.
        match scorer.score(&p, T0, 1_000_000_000.0) {
            Verdict::Suspicious(finding) => assert!((finding.token_amount - 12_345.0).abs() < 1e-6),
            other => panic!("expected suspicious, got {:?}", other),
        }
    }

    #[test]
    fn failed_history_is_not_mistaken_for_no_history() {
        let scorer = InsiderScorer::default();
        let mut p = profile(0, T0, vec![tokens(10_000_000)]);
        p.native = Fetched::Failed {
            message: "NOTOK: Max rate limit reached".into(),
        };
        assert_eq!(
            scorer.score(&p, T0, 1_000_000_000.0),
            Verdict::FetchFailed {
                message: "NOTOK: Max rate limit reached".into()
            }
        );

        let mut p = profile(2, T0, vec![]);
        p.tokens = Fetched::Failed {
            message: "NOTOK".into(),
        };
        assert!(matches!(
            scorer.score(&p, T0, 1_000_000_000.0),
            Verdict::FetchFailed { .. }
        ));
    }

    #[test]
    fn busy_wallet_is_clean() {
        let scorer = InsiderScorer::default();
        let p = profile(5, T0, vec![tokens(10_000_000)]);
        assert_eq!(
            scorer.score(&p, T0, 1_000_000_000.0),
            Verdict::Clean {
                round: true,
                low_activity: false
            }
        );
    }
}
