// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use thiserror::Error;

/// Errors raised while talking to the register bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid bridge host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bridge answered with HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("Response does not contain a register value: {body:?}")]
    MissingValue { body: String },

    #[error("Register value {raw:?} is not a 16-bit unsigned integer")]
    InvalidValue { raw: String },

    #[error("Failed to encode read request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("Status document is not a JSON object")]
    StatusNotObject,
}

impl BridgeError {
    /// True for failures where the bridge never produced an answer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Http(e) if e.is_timeout())
    }
}
