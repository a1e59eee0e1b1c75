// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Explorer API access: queries, transport and the typed client.

mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
mod query;
mod transport;
pub mod types;

pub use client::{ChainClient, Fetched};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryTransport;
pub use query::{canonical, BlockRange, Query, QueryKind};
pub use transport::{ExplorerConfig, HttpTransport, Transport};
