// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Plain-text tables and JSON for the analysis results.

use std::fmt::Write;

use crate::analyzer::RecipientActivity;
use crate::dataset::{Dataset, TxRecord};
use crate::rpc::canonical;
use crate::validators::{ContractContext, Finding, MissingPrerequisite, ScanOutcome};

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unresolved".to_string())
}

pub fn context_summary(ctx: &ContractContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Contract:           {}", canonical(&ctx.contract));
    let _ = writeln!(out, "Deployer:           {}", or_unknown(ctx.deployer.map(|a| canonical(&a))));
    let _ = writeln!(out, "Creation tx:        {}", or_unknown(ctx.creation_tx.map(|h| format!("{:#x}", h))));
    let _ = writeln!(out, "Creation timestamp: {}", or_unknown(ctx.creation_timestamp));
    let _ = writeln!(
        out,
        "Total supply:       {} ({} decimals)",
        or_unknown(ctx.total_supply),
        ctx.supply_decimals
    );
    if let Some(mismatch) = ctx.decimals_mismatch {
        let _ = writeln!(
            out,
            "WARNING: transfers report {} decimals, supply scaled by {}",
            mismatch.transfers, mismatch.supply
        );
    }
    out
}

fn tx_table(title: &str, counterparty: &str, rows: &Dataset, pick: fn(&TxRecord) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(
        out,
        "{:<66}  {:<42}  {:>24}  {:>10}",
        "hash", counterparty, "value", "timeStamp"
    );
    for tx in rows.iter() {
        let _ = writeln!(
            out,
            "{:<66}  {:<42}  {:>24}  {:>10}",
            format!("{:#x}", tx.hash),
            pick(tx),
            tx.value,
            tx.timestamp
        );
    }
    out
}

/// Hash, sender, value and time of each deployer funding transfer.
pub fn funding_table(funding: &Dataset) -> String {
    tx_table("Funding Transactions to Deployer:", "from", funding, |tx| {
        canonical(&tx.from)
    })
}

/// Hash, recipient, value and time of each token transfer.
pub fn distribution_table(transfers: &Dataset) -> String {
    tx_table("Token Distribution from Contract:", "to", transfers, |tx| {
        tx.to.map(|to| canonical(&to)).unwrap_or_default()
    })
}

pub fn activity_table(rows: &[RecipientActivity]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "Wallet {}:", canonical(&row.wallet));
        let _ = writeln!(out, "  ETH Transactions: {}", row.native_txs);
        let _ = writeln!(out, "  Token Transactions: {}", row.token_txs);
        if let Some(message) = &row.fetch_error {
            let _ = writeln!(out, "  Incomplete: {}", message);
        }
    }
    out
}

pub fn findings_table(findings: &[Finding]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Suspicious Wallets (Round Amounts, Low Activity):");
    let _ = writeln!(
        out,
        "{:<42}  {:>24}  {:>10}  {:>8}  {:<19}",
        "wallet", "token_amount", "percentage", "tx_count", "creation_time"
    );
    for f in findings {
        let _ = writeln!(
            out,
            "{:<42}  {:>24.4}  {:>10.4}  {:>8}  {:<19}",
            canonical(&f.wallet),
            f.token_amount,
            f.percentage,
            f.tx_count,
            f.creation_time
        );
    }
    out
}

/// Table for a finished scan, or the reason it did not run.
pub fn scan_summary(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Skipped(MissingPrerequisite::TotalSupply) => {
            "Suspicion scan skipped: total supply unresolved\n".to_string()
        }
        ScanOutcome::Skipped(MissingPrerequisite::DeploymentTimestamp) => {
            "Suspicion scan skipped: deployment timestamp unresolved\n".to_string()
        }
        ScanOutcome::Incomplete { message } => {
            format!("Suspicion scan incomplete: token transfers unavailable ({})\n", message)
        }
        ScanOutcome::Scanned { findings, unscored } => {
            let mut out = if findings.is_empty() {
                "No suspicious wallets found\n".to_string()
            } else {
                findings_table(findings)
            };
            if !unscored.is_empty() {
                let _ = writeln!(out, "Not scored (history unavailable):");
                for wallet in unscored {
                    let _ = writeln!(out, "  {}", canonical(wallet));
                }
            }
            out
        }
    }
}

pub fn findings_json(findings: &[Finding]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding() -> Finding {
        Finding {
            wallet: "0x00000000000000000000000000000000000000AA".parse().unwrap(),
            token_amount: 10_000_000.0,
            percentage: 1.0,
            tx_count: 2,
            creation_time: "2023-11-14 23:13:20".into(),
            creation_timestamp: 1_700_003_600,
        }
    }

    #[test]
    fn findings_table_lists_lowercase_wallets() {
        let table = findings_table(&[finding()]);
        assert!(table.starts_with("Suspicious Wallets"));
        assert!(table.contains("0x00000000000000000000000000000000000000aa"));
        assert!(table.contains("2023-11-14 23:13:20"));
        assert!(table.contains("1.0000"));
    }

    #[test]
    fn skipped_scan_names_the_missing_field() {
        let text = scan_summary(&ScanOutcome::Skipped(MissingPrerequisite::DeploymentTimestamp));
        assert!(text.contains("deployment timestamp"));
        let clean = ScanOutcome::Scanned {
            findings: vec![],
            unscored: vec![],
        };
        assert_eq!(scan_summary(&clean), "No suspicious wallets found\n");
    }

    #[test]
    fn incomplete_scan_is_not_reported_as_clean() {
        let text = scan_summary(&ScanOutcome::Incomplete {
            message: "NOTOK: Max rate limit reached".into(),
        });
        assert!(text.contains("incomplete"));
        assert!(text.contains("Max rate limit reached"));
        assert!(!text.contains("No suspicious wallets found"));

        let partial = ScanOutcome::Scanned {
            findings: vec![],
            unscored: vec![finding().wallet],
        };
        let text = scan_summary(&partial);
        assert!(text.contains("Not scored"));
        assert!(text.contains("0x00000000000000000000000000000000000000aa"));
    }

    #[test]
    fn activity_table_marks_partial_counts() {
        let row = RecipientActivity {
            wallet: finding().wallet,
            native_txs: 0,
            token_txs: 3,
            fetch_error: Some("NOTOK: Invalid API Key".into()),
        };
        let text = activity_table(&[row]);
        assert!(text.contains("Token Transactions: 3"));
        assert!(text.contains("Incomplete: NOTOK: Invalid API Key"));
    }

    #[test]
    fn json_output_is_an_array() {
        let json = findings_json(&[finding()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(1));
        assert_eq!(parsed[0]["tx_count"], 2);
    }

    #[test]
    fn unresolved_context_fields_are_marked() {
        let ctx = crate::validators::ContractResolver::new(Default::default(), 18)
            .context()
            .clone();
        let text = context_summary(&ctx);
        assert!(text.contains("Deployer:           unresolved"));
        assert!(!text.contains("WARNING"));
    }
}
