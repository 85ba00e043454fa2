// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register bridge connection configuration
//!
//! This module defines where the ShineWiFi HTTP-to-Modbus bridge is reached
//! and how long each request may take.

use serde::{Deserialize, Serialize};

/// Address the ShineWiFi stick answers on when it runs as its own access point.
pub const DEFAULT_BRIDGE_HOST: &str = "192.168.4.34";

/// Connection settings for the HTTP register bridge.
///
/// # Fields
///
/// * `host` - Bridge host, `host:port` or full base URL (default: 192.168.4.34)
/// * `read_timeout_ms` - Timeout of a single register read (default: 2000)
/// * `status_timeout_ms` - Timeout of the `/status` request (default: 5000)
///
/// # Example
///
/// ```
/// use shine_probe::config::BridgeConfig;
///
/// let bridge = BridgeConfig {
///     host: "inverter.lan".to_string(),
///     read_timeout_ms: 1000,
///     status_timeout_ms: 5000,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Host of the bridge.
    ///
    /// A bare host is reached over plain HTTP. An explicit `http://` or
    /// `https://` base URL is used as given.
    pub host: String,

    /// Timeout of one register read in milliseconds.
    ///
    /// There is no retry: a read that does not complete in time is reported
    /// as failed.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Timeout of the `/status` request in milliseconds.
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
}

fn default_read_timeout_ms() -> u64 {
    2000
}

fn default_status_timeout_ms() -> u64 {
    5000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BRIDGE_HOST.to_string(),
            read_timeout_ms: default_read_timeout_ms(),
            status_timeout_ms: default_status_timeout_ms(),
        }
    }
}
