// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport to the explorer API.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::Query;
use crate::error::ProviderError;

/// Something that can turn a [`Query`] into the raw JSON reply.
///
/// The HTTP implementation is [`HttpTransport`]; tests serve canned replies.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, query: &Query) -> Result<Value, ProviderError>;
}

/// Configuration for the explorer connection.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub api_key: String,
    /// Sent as `chainid` for multichain endpoints.
    pub chain_id: Option<u64>,
}

/// Plain GET transport with the API key appended to every request.
///
/// No retries and no explicit timeout: a hung request blocks the caller.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: ExplorerConfig,
}

impl HttpTransport {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = query.params().to_vec();
        if let Some(chain_id) = self.config.chain_id {
            params.push(("chainid", chain_id.to_string()));
        }
        params.push(("apikey", self.config.api_key.clone()));
        params
    }
}

impl Transport for HttpTransport {
    async fn get(&self, query: &Query) -> Result<Value, ProviderError> {
        debug!("GET {} ({})", self.config.base_url, query.kind());

        let reply = self
            .http
            .get(&self.config.base_url)
            .query(&self.params(query))
            .send()
            .await?
            .json::<Value>()
            .await?;

        Ok(reply)
    }
}
