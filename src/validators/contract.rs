// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contract context: deployer, creation transaction, deployment time and
//! total supply.
//!
//! Each field is fetched at most once per resolver. Once a field is set it
//! is returned as-is by later calls, never refetched or overwritten.

use alloy::primitives::{Address, B256};
use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::{scale_units, Dataset};
use crate::error::ProviderError;
use crate::rpc::{ChainClient, Fetched, Transport};

/// What is known about the analysed contract so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractContext {
    pub contract: Address,
    pub deployer: Option<Address>,
    pub creation_tx: Option<B256>,
    /// When the deployer was funded for the creation transaction.
    pub creation_timestamp: Option<u64>,
    /// Major units, scaled by `supply_decimals`.
    pub total_supply: Option<f64>,
    pub supply_decimals: u8,
    /// Set when transfers report different decimals than the supply used.
    pub decimals_mismatch: Option<DecimalsMismatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecimalsMismatch {
    pub supply: u8,
    pub transfers: u8,
}

/// Why a context field could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// Provider has no creation record (unverified, self-destructed, proxy).
    NoCreationRecord,
    /// Provider returned a failure status.
    ProviderFailed(String),
    NoSupply,
    /// Deployment time needs the creation transaction first.
    NoCreationTx,
    /// Creation transaction is not among the deployer's funding transfers.
    CreationNotFunded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Unresolved(Unresolved),
}

impl<T> Resolution<T> {
    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

fn unresolved_from<T, U>(fetched: Fetched<T>, empty: Unresolved) -> Resolution<U> {
    match fetched {
        Fetched::Failed { message } => Resolution::Unresolved(Unresolved::ProviderFailed(message)),
        _ => Resolution::Unresolved(empty),
    }
}

/// Memoizing resolver for a single contract.
#[derive(Debug, Clone)]
pub struct ContractResolver {
    context: ContractContext,
}

impl ContractResolver {
    pub fn new(contract: Address, supply_decimals: u8) -> Self {
        Self {
            context: ContractContext {
                contract,
                deployer: None,
                creation_tx: None,
                creation_timestamp: None,
                total_supply: None,
                supply_decimals,
                decimals_mismatch: None,
            },
        }
    }

    pub fn context(&self) -> &ContractContext {
        &self.context
    }

    /// Deployer address and creation transaction hash.
    pub async fn resolve_creation<T: Transport>(
        &mut self,
        client: &ChainClient<T>,
    ) -> Result<Resolution<(Address, B256)>, ProviderError> {
        if let (Some(deployer), Some(tx)) = (self.context.deployer, self.context.creation_tx) {
            return Ok(Resolution::Resolved((deployer, tx)));
        }

        match client.contract_creation(self.context.contract).await? {
            Fetched::Data(creation) => {
                if creation.contract_address != self.context.contract {
                    warn!(
                        "⚠️ Creation record is for {:?}, expected {:?}",
                        creation.contract_address, self.context.contract
                    );
                }
                info!("🏗️ Deployer {:?} (tx {:?})", creation.creator, creation.tx_hash);
                self.context.deployer = Some(creation.creator);
                self.context.creation_tx = Some(creation.tx_hash);
                Ok(Resolution::Resolved((creation.creator, creation.tx_hash)))
            }
            other => Ok(unresolved_from(other, Unresolved::NoCreationRecord)),
        }
    }

    /// Total supply in major units.
    ///
    /// Scaled by the resolver's `supply_decimals`, not by the decimals the
    /// transfers report. See [`ContractResolver::note_transfer_decimals`].
    pub async fn resolve_supply<T: Transport>(
        &mut self,
        client: &ChainClient<T>,
    ) -> Result<Resolution<f64>, ProviderError> {
        if let Some(supply) = self.context.total_supply {
            return Ok(Resolution::Resolved(supply));
        }

        match client.token_supply(self.context.contract).await? {
            Fetched::Data(raw) => {
                let supply = scale_units(&raw, self.context.supply_decimals)?;
                info!("🪙 Total supply: {} ({} decimals)", supply, self.context.supply_decimals);
                self.context.total_supply = Some(supply);
                Ok(Resolution::Resolved(supply))
            }
            other => Ok(unresolved_from(other, Unresolved::NoSupply)),
        }
    }

    /// Deployment time from the deployer's incoming native transfers.
    ///
    /// Only set when one of `funding` has the creation transaction's hash.
    pub fn resolve_deployment_timestamp(&mut self, funding: &Dataset) -> Resolution<u64> {
        if let Some(timestamp) = self.context.creation_timestamp {
            return Resolution::Resolved(timestamp);
        }
        let Some(creation_tx) = self.context.creation_tx else {
            return Resolution::Unresolved(Unresolved::NoCreationTx);
        };

        match funding.find_hash(creation_tx) {
            Some(record) => {
                self.context.creation_timestamp = Some(record.timestamp);
                Resolution::Resolved(record.timestamp)
            }
            None => Resolution::Unresolved(Unresolved::CreationNotFunded),
        }
    }

    /// Record the decimals the transfer batch reported.
    ///
    /// The supply figure is left as fetched; a differing count is flagged on
    /// the context and logged.
    pub fn note_transfer_decimals(&mut self, transfers: u8) {
        let supply = self.context.supply_decimals;
        if transfers == supply || self.context.decimals_mismatch.is_some() {
            return;
        }
        warn!(
            "⚠️ Token transfers use {} decimals but supply was scaled by {}; percentages may be off",
            transfers, supply
        );
        self.context.decimals_mismatch = Some(DecimalsMismatch { supply, transfers });
    }
}
