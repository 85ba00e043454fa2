// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the register bridge probes
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings for the probe tools. The configuration is backed by
//! a YAML file and validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `bridge`: Where the ShineWiFi bridge lives and how long to wait for it
//! - `scan`: Default register range and target values for scans
//! - `fragments`: Named register ranges printed by the fragment report
//!
//! ## Usage
//!
//! ```no_run
//! use shine_probe::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("probe.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("192.168.4.50".to_string()), // Bridge host
//!     Some(1000),                       // Read timeout (ms)
//!     None,                             // Scan start
//!     None,                             // Scan end
//!     Some(vec![2048, 2560]),           // Scan targets
//! );
//!
//! println!("Bridge host: {}", config.bridge.host);
//! ```

pub mod bridge;
pub mod fragment;
pub mod scan;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use bridge::BridgeConfig;
pub use fragment::{default_fragments, Fragment};
pub use scan::ScanConfig;
pub use utils::{is_valid_host, output_config_schema};

/// Root configuration structure for the probe tools.
///
/// Every section falls back to its defaults when missing from the file, so an
/// empty YAML document is a valid configuration pointing at the factory
/// address of the ShineWiFi stick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings for the HTTP register bridge.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Defaults used by the register scan.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Fragments printed by the fragment report, in order.
    ///
    /// If not specified, the protocol 3.07 holding fragments are used.
    #[serde(default = "default_fragments")]
    pub fragments: Vec<Fragment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            scan: ScanConfig::default(),
            fragments: default_fragments(),
        }
    }
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Config path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file failing schema
    /// validation, deserialization or the additional rules yields an error and
    /// leaves a `*.sample.yaml` file with default values next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // An empty document is null in YAML, every section has defaults
        let json_value = if yaml_value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::to_value(&yaml_value).with_context(|| {
                format!("Failed to convert YAML to JSON for validation: {:?}", path)
            })?
        };

        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| anyhow::anyhow!("Invalid configuration schema: {}", e))?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check the effective values, after command line overrides, against the
    /// rules the schema cannot express.
    ///
    /// The scan range is only checked when loading a file: a reversed range
    /// from the command line scans nothing.
    pub fn validate(&self) -> Result<()> {
        utils::validate_override_rules(self)
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only the values that are provided override the existing configuration.
    ///
    /// # Parameters
    ///
    /// * `host` - Bridge host or base URL
    /// * `read_timeout_ms` - Per-register read timeout in milliseconds
    /// * `scan_start` - First register of a scan
    /// * `scan_end` - Last register of a scan (inclusive)
    /// * `target_values` - Values a scan reports
    pub fn apply_args(
        &mut self,
        host: Option<String>,
        read_timeout_ms: Option<u64>,
        scan_start: Option<u16>,
        scan_end: Option<u16>,
        target_values: Option<Vec<u16>>,
    ) {
        if let Some(host) = host {
            debug!("Overriding bridge host from command line: {}", host);
            self.bridge.host = host;
        }
        if let Some(timeout) = read_timeout_ms {
            debug!("Overriding read timeout from command line: {} ms", timeout);
            self.bridge.read_timeout_ms = timeout;
        }
        if let Some(start) = scan_start {
            debug!("Overriding scan start from command line: {}", start);
            self.scan.start = start;
        }
        if let Some(end) = scan_end {
            debug!("Overriding scan end from command line: {}", end);
            self.scan.end = end;
        }
        if let Some(targets) = target_values {
            debug!("Overriding scan targets from command line: {:?}", targets);
            self.scan.target_values = targets;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_factory_address() {
        let config = Config::default();
        assert_eq!(config.bridge.host, "192.168.4.34");
        assert_eq!(config.scan.start, 1);
        assert_eq!(config.scan.end, 1200);
        assert_eq!(config.fragments.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_args_only_overrides_given_values() {
        let mut config = Config::default();
        config.apply_args(None, Some(1000), Some(1000), None, Some(vec![2048, 2560]));

        assert_eq!(config.bridge.host, "192.168.4.34");
        assert_eq!(config.bridge.read_timeout_ms, 1000);
        assert_eq!(config.scan.start, 1000);
        assert_eq!(config.scan.end, 1200);
        assert_eq!(config.scan.target_values, vec![2048, 2560]);
    }

    #[test]
    fn test_reversed_range_from_command_line_is_accepted() {
        let mut config = Config::default();
        config.apply_args(None, None, Some(10), Some(1), None);

        assert!(config.validate().is_ok());
        assert!(utils::validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_from_command_line_is_rejected() {
        let mut config = Config::default();
        config.apply_args(None, Some(0), None, None, None);
        assert!(config.validate().is_err());
    }
}
