// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contract context resolution, wallet profiling and insider scoring.

pub mod contract;
pub mod insider;
pub mod profiler;

pub use contract::{ContractContext, ContractResolver, DecimalsMismatch, Resolution, Unresolved};
pub use insider::{
    Finding, InsiderScorer, MissingPrerequisite, ScanOutcome, ScoringConfig, Verdict,
};
pub use profiler::{FirstSeen, WalletProfile, WalletProfiler};
