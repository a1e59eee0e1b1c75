// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed explorer client.
//!
//! Every reply is wrapped in `{status, message, result}`. Status `"1"` carries
//! data, anything else is a soft failure that callers treat as "nothing
//! found". A reply that is not an envelope at all, or whose `result` does not
//! match the expected row shape, is a hard [`ProviderError::Decode`].

use alloy::primitives::Address;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{ContractCreation, RawTransaction};
use super::{BlockRange, Query, QueryKind, Transport};
use crate::error::ProviderError;

/// Outcome of a provider request that did not hit a hard error.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The provider returned a non-empty payload.
    Data(T),
    /// The provider confirmed there is nothing to return.
    Empty,
    /// The provider reported a failure status.
    Failed { message: String },
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Data(data) => Fetched::Data(f(data)),
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed { message } => Fetched::Failed { message },
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Fetched<U>, E> {
        Ok(match self {
            Fetched::Data(data) => Fetched::Data(f(data)?),
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed { message } => Fetched::Failed { message },
        })
    }

    pub fn as_ref(&self) -> Fetched<&T> {
        match self {
            Fetched::Data(data) => Fetched::Data(data),
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed { message } => Fetched::Failed {
                message: message.clone(),
            },
        }
    }

    pub fn data(self) -> Option<T> {
        match self {
            Fetched::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed { .. })
    }

    /// Collapse to the payload, treating empty and failed alike.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.data().unwrap_or_default()
    }
}

/// Explorer client over any [`Transport`].
#[derive(Debug, Clone)]
pub struct ChainClient<T> {
    transport: T,
}

impl<T: Transport> ChainClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue a raw query and unwrap the envelope.
    pub async fn request(&self, query: &Query) -> Result<Fetched<Value>, ProviderError> {
        let reply = self.transport.get(query).await?;
        decode_envelope(query.kind(), reply)
    }

    async fn request_as<R: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<Fetched<R>, ProviderError> {
        let kind = query.kind();
        self.request(query)
            .await?
            .try_map(|value| serde_json::from_value(value))
            .map_err(|e| ProviderError::decode(kind, e.to_string()))
    }

    /// Deployer and creation transaction of `contract`.
    pub async fn contract_creation(
        &self,
        contract: Address,
    ) -> Result<Fetched<ContractCreation>, ProviderError> {
        let rows: Fetched<Vec<ContractCreation>> =
            self.request_as(&Query::contract_creation(contract)).await?;

        Ok(match rows {
            Fetched::Data(rows) => match rows.into_iter().next() {
                Some(row) => Fetched::Data(row),
                None => Fetched::Empty,
            },
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed { message } => Fetched::Failed { message },
        })
    }

    /// Native coin history of `wallet`, oldest first.
    pub async fn native_transactions(
        &self,
        wallet: Address,
        range: BlockRange,
    ) -> Result<Fetched<Vec<RawTransaction>>, ProviderError> {
        self.request_as(&Query::native_transactions(wallet, range))
            .await
    }

    /// Token transfer events of `contract`, oldest first.
    pub async fn token_transfers(
        &self,
        contract: Address,
        wallet: Option<Address>,
        range: BlockRange,
    ) -> Result<Fetched<Vec<RawTransaction>>, ProviderError> {
        self.request_as(&Query::token_transfers(contract, wallet, range))
            .await
    }

    /// Total supply of `contract` in minor units, as the decimal string the
    /// provider returned.
    pub async fn token_supply(&self, contract: Address) -> Result<Fetched<String>, ProviderError> {
        let fetched = self.request(&Query::token_supply(contract)).await?;
        fetched.try_map(|value| match value {
            Value::String(raw) => Ok(raw),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(ProviderError::decode(
                QueryKind::TokenSupply,
                format!("expected a numeric string, got {}", other),
            )),
        })
    }
}

fn decode_envelope(kind: QueryKind, reply: Value) -> Result<Fetched<Value>, ProviderError> {
    let Value::Object(mut envelope) = reply else {
        return Err(ProviderError::decode(kind, "reply is not a JSON object"));
    };

    let status = match envelope.get("status") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ProviderError::decode(kind, "missing `status` field")),
    };
    let message = envelope
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let result = envelope.remove("result").unwrap_or(Value::Null);

    if status == "1" {
        if is_blank(&result) {
            debug!("{}: empty payload", kind);
            return Ok(Fetched::Empty);
        }
        return Ok(Fetched::Data(result));
    }

    if is_no_data_message(&message) && is_blank(&result) {
        debug!("{}: {}", kind, message);
        return Ok(Fetched::Empty);
    }

    let detail = match &result {
        Value::String(s) if !s.is_empty() => format!("{}: {}", message, s),
        _ => message,
    };
    warn!("⚠️ {} request failed (status {}): {}", kind, status, detail);
    Ok(Fetched::Failed { message: detail })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_no_data_message(message: &str) -> bool {
    message.starts_with("No ") && message.ends_with("found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_one_yields_data() {
        let fetched = decode_envelope(
            QueryKind::TokenSupply,
            json!({"status": "1", "message": "OK", "result": "1000"}),
        )
        .unwrap();
        assert_eq!(fetched, Fetched::Data(json!("1000")));
    }

    #[test]
    fn no_records_is_confirmed_empty() {
        let fetched = decode_envelope(
            QueryKind::NativeTxList,
            json!({"status": "0", "message": "No transactions found", "result": []}),
        )
        .unwrap();
        assert_eq!(fetched, Fetched::Empty);
    }

    #[test]
    fn error_status_is_soft_failure() {
        let fetched = decode_envelope(
            QueryKind::NativeTxList,
            json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"}),
        )
        .unwrap();
        assert_eq!(
            fetched,
            Fetched::Failed {
                message: "NOTOK: Invalid API Key".into()
            }
        );
    }

    #[test]
    fn missing_status_is_decode_error() {
        let err = decode_envelope(QueryKind::TokenTxList, json!({"result": []})).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { kind: QueryKind::TokenTxList, .. }));

        let err = decode_envelope(QueryKind::TokenTxList, json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn fetched_default_collapses_soft_outcomes() {
        let failed: Fetched<Vec<u8>> = Fetched::Failed {
            message: "x".into(),
        };
        assert!(failed.is_failed());
        assert!(failed.unwrap_or_default().is_empty());
        assert_eq!(Fetched::Data(vec![1u8]).map(|v| v.len()), Fetched::Data(1));
    }
}
