// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-wallet activity: native history, token history and first-seen time.
//!
//! Profiles are not cached; profiling a wallet twice fetches twice.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::ProviderError;
use crate::rpc::{BlockRange, ChainClient, Fetched, Transport};

static NOT_FETCHED: Dataset = Dataset::empty();

/// Earliest native transaction of a wallet, used as its creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirstSeen {
    pub timestamp: u64,
    pub block_number: u64,
}

impl FirstSeen {
    fn from_history(native: &Dataset) -> Option<Self> {
        native.earliest().map(|tx| FirstSeen {
            timestamp: tx.timestamp,
            block_number: tx.block_number,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WalletProfile {
    pub wallet: Address,
    pub native: Fetched<Dataset>,
    pub tokens: Fetched<Dataset>,
}

impl WalletProfile {
    /// Native history, empty when the provider had none or failed.
    pub fn native_txs(&self) -> &Dataset {
        loaded(&self.native)
    }

    /// Token history for the analysed contract.
    pub fn token_txs(&self) -> &Dataset {
        loaded(&self.tokens)
    }

    /// `None` for wallets that never transacted in the native coin.
    pub fn first_seen(&self) -> Option<FirstSeen> {
        FirstSeen::from_history(self.native_txs())
    }
}

fn loaded(fetched: &Fetched<Dataset>) -> &Dataset {
    match fetched {
        Fetched::Data(dataset) => dataset,
        _ => &NOT_FETCHED,
    }
}

/// Fetches wallet histories scoped to one token contract.
#[derive(Debug)]
pub struct WalletProfiler<'a, T> {
    client: &'a ChainClient<T>,
    contract: Address,
    range: BlockRange,
}

impl<T> Clone for WalletProfiler<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WalletProfiler<'_, T> {}

impl<'a, T: Transport> WalletProfiler<'a, T> {
    pub fn new(client: &'a ChainClient<T>, contract: Address, range: BlockRange) -> Self {
        Self {
            client,
            contract,
            range,
        }
    }

    pub async fn native_transactions(
        &self,
        wallet: Address,
    ) -> Result<Fetched<Dataset>, ProviderError> {
        self.client
            .native_transactions(wallet, self.range)
            .await?
            .try_map(Dataset::native)
    }

    /// Transfers of the contract's token, narrowed to `wallet` if given.
    pub async fn token_transfers(
        &self,
        wallet: Option<Address>,
    ) -> Result<Fetched<Dataset>, ProviderError> {
        self.client
            .token_transfers(self.contract, wallet, self.range)
            .await?
            .try_map(Dataset::tokens)
    }

    pub async fn estimate_creation_time(
        &self,
        wallet: Address,
    ) -> Result<Option<FirstSeen>, ProviderError> {
        let native = self.native_transactions(wallet).await?;
        Ok(FirstSeen::from_history(loaded(&native)))
    }

    /// Native and token history of `wallet`.
    pub async fn profile(&self, wallet: Address) -> Result<WalletProfile, ProviderError> {
        let native = self.native_transactions(wallet).await?;
        let tokens = self.token_transfers(Some(wallet)).await?;

        let profile = WalletProfile {
            wallet,
            native,
            tokens,
        };
        debug!(
            "Wallet {:?}: {} native txs, {} token txs",
            wallet,
            profile.native_txs().len(),
            profile.token_txs().len()
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{MemoryTransport, QueryKind};
    use serde_json::json;

    const CONTRACT: &str = "0x00000000000000000000000000000000000000cc";
    const WALLET: &str = "0x00000000000000000000000000000000000000aa";

    fn tx(hash_byte: u8, ts: u64, block: u64) -> serde_json::Value {
        json!({
            "hash": format!("0x{}", format!("{:02x}", hash_byte).repeat(32)),
            "from": "0x00000000000000000000000000000000000000f0",
            "to": WALLET,
            "value": "1000000000000000000",
            "timeStamp": ts.to_string(),
            "blockNumber": block.to_string()
        })
    }

    #[tokio::test]
    async fn creation_time_is_first_native_transaction() {
        let wallet: Address = WALLET.parse().unwrap();
        let client = ChainClient::new(MemoryTransport::new().ok(
            QueryKind::NativeTxList,
            Some(wallet),
            json!([tx(1, 1_000, 10), tx(2, 2_000, 20)]),
        ));
        let profiler = WalletProfiler::new(&client, CONTRACT.parse().unwrap(), BlockRange::default());

        let first = profiler.estimate_creation_time(wallet).await.unwrap();
        assert_eq!(
            first,
            Some(FirstSeen {
                timestamp: 1_000,
                block_number: 10
            })
        );
    }

    #[tokio::test]
    async fn wallet_without_native_history_is_unknown() {
        let wallet: Address = WALLET.parse().unwrap();
        let client = ChainClient::new(MemoryTransport::new().ok(
            QueryKind::TokenTxList,
            Some(wallet),
            json!([tx(3, 1_000, 10)]),
        ));
        let profiler = WalletProfiler::new(&client, CONTRACT.parse().unwrap(), BlockRange::default());

        assert_eq!(profiler.estimate_creation_time(wallet).await.unwrap(), None);

        let profile = profiler.profile(wallet).await.unwrap();
        assert_eq!(profile.native, Fetched::Empty);
        assert_eq!(profile.token_txs().len(), 1);
        assert!(profile.first_seen().is_none());
    }

    #[tokio::test]
    async fn profiles_are_not_cached() {
        let wallet: Address = WALLET.parse().unwrap();
        let client = ChainClient::new(MemoryTransport::new());
        let profiler = WalletProfiler::new(&client, CONTRACT.parse().unwrap(), BlockRange::default());

        profiler.profile(wallet).await.unwrap();
        profiler.profile(wallet).await.unwrap();
        assert_eq!(client.transport().count(QueryKind::NativeTxList), 2);
        assert_eq!(client.transport().count(QueryKind::TokenTxList), 2);
    }
}
