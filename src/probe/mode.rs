// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Current operating mode of the inverter

use std::fmt;

use serde_json::Value;

use crate::bridge::{BridgeClient, BridgeError, RegisterAddress, RegisterKind, RegisterReader};
use crate::status::{PlainValue, StatusSnapshot};

/// Input register holding the current operating mode
pub const CURRENT_MODE_REGISTER: u16 = 118;

/// Operating mode reported in IR118
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverterMode {
    LoadFirst,
    BatteryFirst,
    GridFirst,
    Unknown(u64),
}

impl InverterMode {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => InverterMode::LoadFirst,
            1 => InverterMode::BatteryFirst,
            2 => InverterMode::GridFirst,
            other => InverterMode::Unknown(other),
        }
    }

    pub fn from_register(value: u16) -> Self {
        Self::from_code(u64::from(value))
    }

    /// Description of a mode value that is not an integer code
    pub fn describe_raw(value: &Value) -> String {
        format!("Unknown ({})", PlainValue(value))
    }
}

impl fmt::Display for InverterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InverterMode::LoadFirst => write!(f, "Load-first"),
            InverterMode::BatteryFirst => write!(f, "Battery-first"),
            InverterMode::GridFirst => write!(f, "Grid-first"),
            InverterMode::Unknown(code) => write!(f, "Unknown ({})", code),
        }
    }
}

/// Read IR118 and decode it, `None` if the read failed
pub async fn read_current_mode<R>(reader: &R) -> Option<(u16, InverterMode)>
where
    R: RegisterReader + ?Sized,
{
    let value = reader
        .try_read_register(RegisterKind::Input, CURRENT_MODE_REGISTER)
        .await?;
    Some((value, InverterMode::from_register(value)))
}

/// Operating mode as seen in IR118 and in the status document
#[derive(Debug)]
pub struct ModeReport {
    /// Raw IR118 value and its decoding, `None` if the read failed
    pub register: Option<(u16, InverterMode)>,
    pub status: Result<StatusSnapshot, BridgeError>,
}

impl fmt::Display for ModeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let register = RegisterAddress::input(CURRENT_MODE_REGISTER);
        writeln!(
            f,
            "Testing Input Register {} (Current Mode):",
            CURRENT_MODE_REGISTER
        )?;
        writeln!(f, "{}", "=".repeat(45))?;
        match self.register {
            Some((value, mode)) => writeln!(f, "{} (CurrentMode): {} = {}", register, value, mode)?,
            None => writeln!(f, "Failed to read {}", register)?,
        }

        writeln!(f, "\nChecking Status JSON:")?;
        writeln!(f, "{}", "-".repeat(45))?;
        match &self.status {
            Ok(status) => match status.current_mode() {
                Some(mode) => writeln!(f, "CurrentMode: {}", mode),
                None => writeln!(f, "CurrentMode not found in status JSON"),
            },
            Err(e) => writeln!(f, "Failed to get status: {}", e),
        }
    }
}

/// Read IR118, then fetch the status document
pub async fn check_mode(client: &BridgeClient) -> ModeReport {
    let register = read_current_mode(client).await;
    let status = client.fetch_status().await;
    ModeReport { register, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_names() {
        assert_eq!(InverterMode::from_register(0).to_string(), "Load-first");
        assert_eq!(InverterMode::from_register(1).to_string(), "Battery-first");
        assert_eq!(InverterMode::from_register(2).to_string(), "Grid-first");
        assert_eq!(InverterMode::from_register(7).to_string(), "Unknown (7)");
    }

    #[test]
    fn test_report_with_failed_read_and_no_mode_key() {
        let report = ModeReport {
            register: None,
            status: StatusSnapshot::from_value(json!({ "Pac": 0 })),
        };
        assert_eq!(
            report.to_string(),
            "Testing Input Register 118 (Current Mode):\n\
             =============================================\n\
             Failed to read IR118\n\
             \n\
             Checking Status JSON:\n\
             ---------------------------------------------\n\
             CurrentMode not found in status JSON\n"
        );
    }

    #[test]
    fn test_report_with_both_sources() {
        let report = ModeReport {
            register: Some((2, InverterMode::GridFirst)),
            status: StatusSnapshot::from_value(json!({ "CurrentMode": "2" })),
        };
        let text = report.to_string();
        assert!(text.contains("IR118 (CurrentMode): 2 = Grid-first\n"));
        assert!(text.ends_with("CurrentMode: 2 = Unknown (2)\n"));
    }
}
