// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register scan configuration

use serde::{Deserialize, Serialize};

/// Defaults for the register scan.
///
/// The scan walks `start..=end` one register at a time and reports the
/// registers holding one of `target_values`. The default targets (99 and 990)
/// are the markers written into the inverter by hand to locate a setting;
/// time slots are found with 2048 (08:00) and 2560 (10:00).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// First register scanned.
    pub start: u16,

    /// Last register scanned, inclusive.
    pub end: u16,

    /// Values reported when found.
    pub target_values: Vec<u16>,

    /// Print a progress line every `progress_interval` registers in summary
    /// mode. Zero disables progress lines.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u16,
}

fn default_progress_interval() -> u16 {
    100
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: 1,
            end: 1200,
            target_values: vec![99, 990],
            progress_interval: default_progress_interval(),
        }
    }
}
