// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Insider allocation scanner for ERC-20 token launches.
//!
//! Correlates a contract's creation record, its token transfers and the
//! histories of every recipient to flag wallets that were created around
//! deployment, received a round allocation and then stayed quiet.

pub mod analyzer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod rpc;
pub mod validators;

pub use analyzer::{AnalyzerConfig, ContractAnalyzer, RecipientActivity};
pub use error::ProviderError;
