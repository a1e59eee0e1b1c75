// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Raw row shapes as the explorer returns them.
//!
//! Numeric columns arrive as decimal strings and are left untouched here;
//! [`crate::dataset::Dataset`] parses and scales them once at ingestion.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Deserializer};

/// One row of `txlist` or `tokentx`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    pub hash: B256,
    pub from: Address,
    /// Empty for contract creation transactions.
    #[serde(default, deserialize_with = "optional_address")]
    pub to: Option<Address>,
    pub value: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(rename = "tokenDecimal", default)]
    pub token_decimal: Option<String>,
    #[serde(rename = "tokenSymbol", default)]
    pub token_symbol: Option<String>,
}

/// One row of `getcontractcreation`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractCreation {
    #[serde(rename = "contractAddress")]
    pub contract_address: Address,
    #[serde(rename = "contractCreator")]
    pub creator: Address,
    #[serde(rename = "txHash")]
    pub tx_hash: B256,
}

fn optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creation_transaction_has_no_recipient() {
        let row: RawTransaction = serde_json::from_value(json!({
            "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "from": "0x00000000000000000000000000000000000000AA",
            "to": "",
            "value": "0",
            "timeStamp": "1700000000",
            "blockNumber": "18000000",
            "contractAddress": "0x00000000000000000000000000000000000000cc"
        }))
        .unwrap();
        assert!(row.to.is_none());
        assert!(row.token_decimal.is_none());
    }

    #[test]
    fn mixed_case_addresses_compare_equal() {
        let row: RawTransaction = serde_json::from_value(json!({
            "hash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "from": "0x00000000000000000000000000000000000000aa",
            "to": "0x00000000000000000000000000000000000000BB",
            "value": "1",
            "timeStamp": "1",
            "blockNumber": "1",
            "tokenDecimal": "6"
        }))
        .unwrap();
        let expected: Address = "0x00000000000000000000000000000000000000bb".parse().unwrap();
        assert_eq!(row.to, Some(expected));
        assert_eq!(row.token_decimal.as_deref(), Some("6"));
    }
}
