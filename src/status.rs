// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Status document of the ShineWiFi stick
//!
//! `GET /status` returns a flat JSON object holding the values the firmware
//! last read from the inverter, keyed by register name (`CurrentMode`,
//! `GridFirstPwrRate`, `BattFirstSOC`, ...).

use std::fmt;

use serde_json::{Map, Value};

use crate::bridge::BridgeError;
use crate::probe::mode::InverterMode;
use crate::probe::SECTION_RULE;

/// Key of the operating mode in the status document
pub const CURRENT_MODE_KEY: &str = "CurrentMode";

/// Needles selecting the grid related keys
pub const GRID_KEY_NEEDLES: [&str; 2] = ["Grid", "grid"];

/// Needles selecting the battery related keys
pub const BATTERY_KEY_NEEDLES: [&str; 2] = ["Batt", "batt"];

/// The JSON object returned by `/status`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    fields: Map<String, Value>,
}

/// Operating mode as found in the status document
#[derive(Debug, Clone, PartialEq)]
pub enum ModeValue {
    /// An integer mode code
    Known { code: u64, mode: InverterMode },
    /// Anything else, kept verbatim
    Raw(Value),
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeValue::Known { code, mode } => write!(f, "{} = {}", code, mode),
            ModeValue::Raw(value) => write!(
                f,
                "{} = {}",
                PlainValue(value),
                InverterMode::describe_raw(value)
            ),
        }
    }
}

/// A status value as printed for humans: strings without their quotes
#[derive(Debug, Clone, Copy)]
pub struct PlainValue<'a>(pub &'a Value);

impl fmt::Display for PlainValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{}", other),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[(&str, &Value)]) -> fmt::Result {
    for (key, value) in fields {
        writeln!(f, "  {}: {}", key, PlainValue(value))?;
    }
    Ok(())
}

/// Grid and battery keys of a `/status` fetch.
///
/// A missing battery section is left out, a missing grid section is
/// reported. A failed fetch prints the error instead.
#[derive(Debug)]
pub struct StatusKeysReport {
    pub status: Result<StatusSnapshot, BridgeError>,
}

impl fmt::Display for StatusKeysReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.status {
            Ok(status) => status,
            Err(e) => return writeln!(f, "Failed to get status: {}", e),
        };

        let grid = status.keys_containing(&GRID_KEY_NEEDLES);
        if grid.is_empty() {
            writeln!(f, "\nNo Grid-related keys found in status JSON!")?;
        } else {
            writeln!(f, "\nGrid-related keys found:")?;
            write_fields(f, &grid)?;
        }

        let battery = status.keys_containing(&BATTERY_KEY_NEEDLES);
        if !battery.is_empty() {
            writeln!(f, "\nBattery-related keys found:")?;
            write_fields(f, &battery)?;
        }
        Ok(())
    }
}

/// Every key of a `/status` fetch, sorted
#[derive(Debug)]
pub struct StatusListing {
    pub status: Result<StatusSnapshot, BridgeError>,
}

impl fmt::Display for StatusListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Err(e) => writeln!(f, "Failed to get status: {}", e),
            Ok(status) if status.is_empty() => writeln!(f, "Status JSON is empty"),
            Ok(status) => {
                writeln!(f, "Status JSON ({} keys):", status.len())?;
                writeln!(f, "{}", SECTION_RULE)?;
                write_fields(f, &status.fields())
            }
        }
    }
}

impl StatusSnapshot {
    /// Wrap a decoded document, which must be a JSON object
    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(BridgeError::StatusNotObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields, sorted by key
    pub fn fields(&self) -> Vec<(&str, &Value)> {
        let mut fields: Vec<_> = self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }

    /// Fields whose key contains any of `needles`, sorted by key
    pub fn keys_containing(&self, needles: &[&str]) -> Vec<(&str, &Value)> {
        self.fields()
            .into_iter()
            .filter(|(key, _)| needles.iter().any(|needle| key.contains(needle)))
            .collect()
    }

    /// The operating mode, `None` if the document has no `CurrentMode` key
    pub fn current_mode(&self) -> Option<ModeValue> {
        let value = self.get(CURRENT_MODE_KEY)?;
        Some(match value.as_u64() {
            Some(code) => ModeValue::Known {
                code,
                mode: InverterMode::from_code(code),
            },
            None => ModeValue::Raw(value.clone()),
        })
    }
}
