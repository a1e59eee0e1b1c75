// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hard failures when talking to the explorer API.
//!
//! A provider that answers with a failure status is not an error here; that
//! is reported through [`crate::rpc::Fetched::Failed`]. Only transport
//! problems and replies that break the envelope contract end up in
//! [`ProviderError`].

use thiserror::Error;

use crate::rpc::QueryKind;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed {kind} reply: {message}")]
    Decode { kind: QueryKind, message: String },

    #[error("Invalid numeric field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ProviderError {
    pub(crate) fn decode(kind: QueryKind, message: impl Into<String>) -> Self {
        Self::Decode {
            kind,
            message: message.into(),
        }
    }
}
