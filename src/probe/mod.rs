// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register probes
//!
//! Diagnostics built on top of a [`crate::bridge::RegisterReader`]. Every
//! probe reads registers strictly one after the other and never fails on a
//! single bad read: the read is reported as failed (fragments, mode) or
//! skipped (scan).
//!
//! - `fragments`: Print named register ranges with decoded time slots
//! - `scan`: Find the registers holding given values
//! - `mode`: Decode the inverter's current operating mode
//! - `time`: Decode time-of-day registers

pub mod fragments;
pub mod mode;
pub mod scan;
pub mod time;

pub use fragments::{
    check_fragments, read_fragment, read_fragments, FragmentCheck, FragmentReport, RegisterReading,
};
pub use mode::{check_mode, read_current_mode, InverterMode, ModeReport, CURRENT_MODE_REGISTER};
pub use scan::{scan_registers, ScanEvent, ScanHit, ScanOptions, ScanOutcome};
pub use time::{is_time_slot_register, time_annotation, TimeOfDay};

/// Rule printed under section titles
pub const SECTION_RULE: &str = "----------------------------------------";
