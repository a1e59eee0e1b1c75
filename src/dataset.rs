// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory table of transaction-like records.
//!
//! Raw explorer rows are parsed and unit-normalized exactly once, when the
//! dataset is built. A dataset with zero rows is a real, loaded dataset; "not
//! loaded yet" is expressed by the caller holding no dataset at all.

use alloy::primitives::{Address, B256};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::ProviderError;
use crate::rpc::types::RawTransaction;

/// Native coin minor units per major unit (wei per ether).
pub const NATIVE_DECIMALS: u8 = 18;

/// Assumed token decimals when a batch does not report any.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// A normalized transaction or token transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxRecord {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    /// Major units.
    pub value: f64,
    /// Unix seconds.
    pub timestamp: u64,
    pub block_number: u64,
}

/// Where the decimal count for a batch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Fixed(u8),
    /// Read `tokenDecimal` from the first row, else use `fallback`.
    Discover { fallback: u8 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<TxRecord>,
    decimals: Option<u8>,
}

impl Dataset {
    pub const fn empty() -> Self {
        Self {
            rows: Vec::new(),
            decimals: None,
        }
    }

    /// Parse and scale raw rows. Rows keep the provider's order.
    pub fn from_raw(rows: Vec<RawTransaction>, scale: Scale) -> Result<Self, ProviderError> {
        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let decimals = match scale {
            Scale::Fixed(decimals) => decimals,
            Scale::Discover { fallback } => match rows[0].token_decimal.as_deref() {
                Some(raw) => parse_number::<u8>("tokenDecimal", raw)?,
                None => fallback,
            },
        };

        let rows = rows
            .into_iter()
            .map(|raw| {
                Ok(TxRecord {
                    hash: raw.hash,
                    from: raw.from,
                    to: raw.to,
                    value: scale_units(&raw.value, decimals)?,
                    timestamp: parse_number("timeStamp", &raw.time_stamp)?,
                    block_number: parse_number("blockNumber", &raw.block_number)?,
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Ok(Self {
            rows,
            decimals: Some(decimals),
        })
    }

    /// Native coin history, scaled by 18 decimals.
    pub fn native(rows: Vec<RawTransaction>) -> Result<Self, ProviderError> {
        Self::from_raw(rows, Scale::Fixed(NATIVE_DECIMALS))
    }

    /// Token transfers, scaled by the decimals the batch reports.
    pub fn tokens(rows: Vec<RawTransaction>) -> Result<Self, ProviderError> {
        Self::from_raw(
            rows,
            Scale::Discover {
                fallback: DEFAULT_TOKEN_DECIMALS,
            },
        )
    }

    /// Decimals the values were scaled by. `None` for an empty dataset.
    pub fn decimals(&self) -> Option<u8> {
        self.decimals
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TxRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &TxRecord> {
        self.rows.iter()
    }

    pub fn filter(&self, mut predicate: impl FnMut(&TxRecord) -> bool) -> Dataset {
        Dataset {
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
            decimals: self.decimals,
        }
    }

    /// Rows sent to `address`.
    pub fn incoming(&self, address: Address) -> Dataset {
        self.filter(|r| r.to == Some(address))
    }

    /// Earliest row. Queries request ascending order, so this is the first.
    pub fn earliest(&self) -> Option<&TxRecord> {
        self.rows.first()
    }

    pub fn find_hash(&self, hash: B256) -> Option<&TxRecord> {
        self.rows.iter().find(|r| r.hash == hash)
    }

    /// Sum of values received by `address`.
    pub fn total_received(&self, address: Address) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.to == Some(address))
            .map(|r| r.value)
            .sum()
    }

    /// Distinct recipients in order of first appearance.
    pub fn recipients(&self) -> Vec<Address> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.to)
            .filter(|to| seen.insert(*to))
            .collect()
    }
}

/// Convert a minor-unit decimal string to major units.
pub fn scale_units(raw: &str, decimals: u8) -> Result<f64, ProviderError> {
    let minor: f64 = parse_number("value", raw)?;
    Ok(minor / 10f64.powi(decimals as i32))
}

fn parse_number<N: std::str::FromStr>(field: &'static str, raw: &str) -> Result<N, ProviderError> {
    raw.trim().parse().map_err(|_| ProviderError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}
