// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory transport serving canned explorer replies.
//!
//! Replies are keyed by query kind and the `address` parameter (absent for
//! contract-wide queries). Anything not registered answers with the
//! explorer's "No transactions found" envelope.

use alloy::primitives::Address;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::query::canonical;
use super::{Query, QueryKind, Transport};
use crate::error::ProviderError;

type ReplyKey = (QueryKind, Option<String>);

#[derive(Debug, Default)]
pub struct MemoryTransport {
    replies: HashMap<ReplyKey, Value>,
    log: Mutex<Vec<Query>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full reply envelope.
    pub fn reply(mut self, kind: QueryKind, wallet: Option<Address>, envelope: Value) -> Self {
        self.replies
            .insert((kind, wallet.map(|w| canonical(&w))), envelope);
        self
    }

    /// Register a successful reply carrying `result`.
    pub fn ok(self, kind: QueryKind, wallet: Option<Address>, result: Value) -> Self {
        self.reply(kind, wallet, json!({"status": "1", "message": "OK", "result": result}))
    }

    /// Every query served so far, in order.
    pub fn requests(&self) -> Vec<Query> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self, kind: QueryKind) -> usize {
        self.requests().iter().filter(|q| q.kind() == kind).count()
    }
}

impl Transport for MemoryTransport {
    async fn get(&self, query: &Query) -> Result<Value, ProviderError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let key = (query.kind(), query.param("address").map(str::to_string));
        Ok(self.replies.get(&key).cloned().unwrap_or_else(|| {
            json!({"status": "0", "message": "No transactions found", "result": []})
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[tokio::test]
    async fn poisoned_log_keeps_recording() {
        let transport = MemoryTransport::new();
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = transport.log.lock().unwrap();
            panic!("test thread died holding the log");
        }));
        assert!(transport.log.is_poisoned());

        let query = Query::token_supply(Address::ZERO);
        let reply = transport.get(&query).await.unwrap();

        assert_eq!(reply["message"], "No transactions found");
        assert_eq!(transport.count(QueryKind::TokenSupply), 1);
    }
}
