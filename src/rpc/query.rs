// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Query parameter bags for the explorer API.

use alloy::primitives::Address;
use std::fmt;

/// Block window for history queries. Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl Default for BlockRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: 99_999_999,
        }
    }
}

/// The four request kinds the analyzer issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    CreationLookup,
    NativeTxList,
    TokenTxList,
    TokenSupply,
}

impl QueryKind {
    /// `(module, action)` pair on the explorer endpoint.
    pub fn endpoint(&self) -> (&'static str, &'static str) {
        match self {
            QueryKind::CreationLookup => ("contract", "getcontractcreation"),
            QueryKind::NativeTxList => ("account", "txlist"),
            QueryKind::TokenTxList => ("account", "tokentx"),
            QueryKind::TokenSupply => ("stats", "tokensupply"),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::CreationLookup => "creation-lookup",
            QueryKind::NativeTxList => "native-tx-list",
            QueryKind::TokenTxList => "token-tx-list",
            QueryKind::TokenSupply => "token-supply",
        };
        f.write_str(name)
    }
}

/// A single request: kind plus its key-value parameters.
///
/// Credentials are not part of the query; the transport appends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: QueryKind,
    params: Vec<(&'static str, String)>,
}

impl Query {
    fn new(kind: QueryKind) -> Self {
        let (module, action) = kind.endpoint();
        Self {
            kind,
            params: vec![("module", module.to_string()), ("action", action.to_string())],
        }
    }

    fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    fn with_range(self, range: BlockRange) -> Self {
        self.with("startblock", range.start.to_string())
            .with("endblock", range.end.to_string())
            .with("sort", "asc")
    }

    pub fn contract_creation(contract: Address) -> Self {
        Self::new(QueryKind::CreationLookup).with("contractaddresses", canonical(&contract))
    }

    /// Native coin history of `wallet`, oldest first.
    pub fn native_transactions(wallet: Address, range: BlockRange) -> Self {
        Self::new(QueryKind::NativeTxList)
            .with("address", canonical(&wallet))
            .with_range(range)
    }

    /// Token transfer events of `contract`, optionally narrowed to `wallet`.
    pub fn token_transfers(contract: Address, wallet: Option<Address>, range: BlockRange) -> Self {
        let query = Self::new(QueryKind::TokenTxList)
            .with("contractaddress", canonical(&contract))
            .with_range(range);
        match wallet {
            Some(wallet) => query.with("address", canonical(&wallet)),
            None => query,
        }
    }

    pub fn token_supply(contract: Address) -> Self {
        Self::new(QueryKind::TokenSupply).with("contractaddress", canonical(&contract))
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of a parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Lowercase `0x`-prefixed form used on the wire and in reports.
pub fn canonical(address: &Address) -> String {
    format!("{:#x}", address)
}
