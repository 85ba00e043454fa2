// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Time-of-day registers
//!
//! The Grid First and Battery First time slots store a time of day in one
//! register, hour in the high byte and minute in the low byte: 08:00 is
//! `0x0800` (2048), 10:00 is `0x0A00` (2560).

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime};

/// Grid First time slot registers
pub const GRID_FIRST_SLOTS: RangeInclusive<u16> = 1080..=1088;

/// Battery First time slot registers
pub const BATTERY_FIRST_SLOTS: RangeInclusive<u16> = 1100..=1108;

/// First register of the system clock (year, month, day, hour, minute, second)
pub const SYSTEM_CLOCK_START: u16 = 45;

/// A time of day packed in a 16-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn from_register(value: u16) -> Self {
        Self {
            hour: (value >> 8) as u8,
            minute: (value & 0xFF) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// True for the registers of the Grid First and Battery First time slots
pub fn is_time_slot_register(address: u16) -> bool {
    GRID_FIRST_SLOTS.contains(&address) || BATTERY_FIRST_SLOTS.contains(&address)
}

/// Time of day shown next to a register value.
///
/// Only time slot registers are decoded, and only values of at least 256:
/// smaller values are enable flags or a midnight start and print as numbers.
pub fn time_annotation(address: u16, value: u16) -> Option<TimeOfDay> {
    (is_time_slot_register(address) && value >= 256).then(|| TimeOfDay::from_register(value))
}

/// Combine the system clock registers HR45..HR50 into a date and time.
///
/// Two-digit years are taken as 20xx. Returns `None` when the registers do
/// not form a valid date.
pub fn system_datetime(clock: [u16; 6]) -> Option<NaiveDateTime> {
    let [year, month, day, hour, minute, second] = clock;
    let year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?.and_hms_opt(
        u32::from(hour),
        u32::from(minute),
        u32::from(second),
    )
}
