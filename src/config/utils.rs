// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./shine_probe --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Check if a string looks like a usable bridge host
///
/// Accepts IPv4/IPv6 addresses, DNS-style names, either of them followed by
/// a `:port`, and `http://`/`https://` base URLs.
///
/// # Arguments
///
/// * `host` - The host string to validate
///
/// # Returns
///
/// `true` if the host is valid, `false` otherwise
pub fn is_valid_host(host: &str) -> bool {
    if host.starts_with("http://") || host.starts_with("https://") {
        return url::Url::parse(host).is_ok_and(|u| u.host_str().is_some());
    }

    if host.parse::<std::net::IpAddr>().is_ok() || host.parse::<std::net::SocketAddr>().is_ok() {
        return true;
    }

    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.parse::<u16>().is_ok() => name,
        Some(_) => return false,
        None => host,
    };

    !name.is_empty()
        && name.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Validates a configuration file against additional rules the JSON schema can't express.
///
/// # Validation Rules
///
/// - **Scan range**: `start` must not be greater than `end`
/// - every rule of [`validate_override_rules`]
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if config.scan.start > config.scan.end {
        anyhow::bail!(
            "Invalid scan range: start {} is greater than end {}",
            config.scan.start,
            config.scan.end
        );
    }

    validate_override_rules(config)
}

/// Rules that still hold once command line values are applied.
///
/// A reversed scan range given on the command line is not an error, the scan
/// simply reads nothing.
///
/// # Validation Rules
///
/// - **Host**: must not be blank; an unusual host only logs a debug line
/// - **Timeouts**: must be greater than zero
/// - **Scan targets**: at least one target value
/// - **Fragments**: non-empty names, `size >= 1`, and the last register must fit in 16 bits
pub fn validate_override_rules(config: &Config) -> Result<()> {

    if config.bridge.host.trim().is_empty() {
        anyhow::bail!("Bridge host must not be empty");
    }
    if !is_valid_host(&config.bridge.host) {
        // Just issue a note but don't block, the resolver has the last word
        debug!("Potentially invalid host format: {}", config.bridge.host);
    }

    if config.bridge.read_timeout_ms == 0 {
        anyhow::bail!("Read timeout must be greater than zero");
    }
    if config.bridge.status_timeout_ms == 0 {
        anyhow::bail!("Status timeout must be greater than zero");
    }

    if config.scan.target_values.is_empty() {
        anyhow::bail!("Scan needs at least one target value");
    }

    for fragment in &config.fragments {
        if fragment.name.trim().is_empty() {
            anyhow::bail!("Fragment starting at HR{} has no name", fragment.start);
        }
        if fragment.size == 0 {
            anyhow::bail!("Fragment '{}' is empty", fragment.name);
        }
        if fragment.end().is_none() {
            anyhow::bail!(
                "Fragment '{}' runs past the last register (start {}, size {})",
                fragment.name,
                fragment.start,
                fragment.size
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fragment;

    #[test]
    fn test_is_valid_host() {
        assert!(is_valid_host("192.168.4.34"));
        assert!(is_valid_host("192.168.4.34:8080"));
        assert!(is_valid_host("inverter.lan"));
        assert!(is_valid_host("shine-wifi:80"));
        assert!(is_valid_host("http://127.0.0.1:9000"));
        assert!(is_valid_host("::1"));

        assert!(!is_valid_host(""));
        assert!(!is_valid_host("inverter lan"));
        assert!(!is_valid_host("inverter:port"));
        assert!(!is_valid_host("http://"));
    }

    #[test]
    fn test_rejects_reversed_scan_range() {
        let mut config = Config::default();
        config.scan.start = 1200;
        config.scan.end = 1;
        let err = validate_specific_rules(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid scan range"));
    }

    #[test]
    fn test_rejects_overflowing_fragment() {
        let mut config = Config::default();
        config.fragments.push(Fragment::new("Too far", 65530, 10));
        let err = validate_specific_rules(&config).unwrap_err();
        assert!(err.to_string().contains("runs past the last register"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.bridge.read_timeout_ms = 0;
        assert!(validate_specific_rules(&config).is_err());
    }
}
