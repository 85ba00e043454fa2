// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fragment reports
//!
//! Reads every holding register of a fragment and prints one line per
//! register. Time slot registers get their `HH:MM` decoding appended, and a
//! fragment covering the system clock gets the combined date and time.

use std::fmt;

use chrono::NaiveDateTime;
use log::debug;

use super::time::{system_datetime, time_annotation, TimeOfDay, SYSTEM_CLOCK_START};
use super::SECTION_RULE;
use crate::bridge::{BridgeClient, RegisterAddress, RegisterKind, RegisterReader};
use crate::config::Fragment;
use crate::status::StatusKeysReport;

/// One register read, `value` is `None` when the read failed.
///
/// Holding time slot registers get their `HH:MM` decoding appended, input
/// registers are printed as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterReading {
    pub register: RegisterAddress,
    pub value: Option<u16>,
}

impl RegisterReading {
    /// Read `register` once
    pub async fn read<R>(reader: &R, register: RegisterAddress) -> Self
    where
        R: RegisterReader + ?Sized,
    {
        let value = reader
            .try_read_register(register.kind, register.address)
            .await;
        Self { register, value }
    }

    fn annotation(&self, value: u16) -> Option<TimeOfDay> {
        match self.register.kind {
            RegisterKind::Holding => time_annotation(self.register.address, value),
            RegisterKind::Input => None,
        }
    }
}

impl fmt::Display for RegisterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => match self.annotation(value) {
                Some(time) => write!(f, "{}: {} ({})", self.register, value, time),
                None => write!(f, "{}: {}", self.register, value),
            },
            None => write!(f, "{}: <read failed>", self.register),
        }
    }
}

/// Readings of one fragment, in register order
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentReport {
    pub fragment: Fragment,
    pub readings: Vec<RegisterReading>,
}

impl FragmentReport {
    pub fn failed_reads(&self) -> usize {
        self.readings.iter().filter(|r| r.value.is_none()).count()
    }

    fn value_at(&self, address: u16) -> Option<u16> {
        self.readings
            .iter()
            .find(|r| r.register.address == address)
            .and_then(|r| r.value)
    }

    /// System clock, when the fragment covers HR45..HR50 and all six reads
    /// succeeded
    pub fn system_datetime(&self) -> Option<NaiveDateTime> {
        let mut clock = [0u16; 6];
        for (slot, address) in clock.iter_mut().zip(SYSTEM_CLOCK_START..) {
            *slot = self.value_at(address)?;
        }
        system_datetime(clock)
    }
}

impl fmt::Display for FragmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.fragment.start;
        let end = self.fragment.end().unwrap_or(start);
        writeln!(f, "{} (HR{}-{}):", self.fragment.name, start, end)?;
        writeln!(f, "{}", SECTION_RULE)?;
        for reading in &self.readings {
            writeln!(f, "  {}", reading)?;
        }
        if let Some(clock) = self.system_datetime() {
            writeln!(f, "  System time: {}", clock.format("%Y-%m-%d %H:%M:%S"))?;
        }
        Ok(())
    }
}

/// Read every register of `fragment`, one request at a time
pub async fn read_fragment<R>(reader: &R, fragment: &Fragment) -> FragmentReport
where
    R: RegisterReader + ?Sized,
{
    debug!(
        "Reading fragment '{}' ({} registers from HR{})",
        fragment.name, fragment.size, fragment.start
    );
    let mut readings = Vec::with_capacity(usize::from(fragment.size));
    for address in fragment.registers() {
        readings.push(RegisterReading::read(reader, RegisterAddress::holding(address)).await);
    }
    let report = FragmentReport {
        fragment: fragment.clone(),
        readings,
    };

    let failed = report.failed_reads();
    if failed > 0 {
        debug!(
            "{} of {} reads failed in fragment '{}'",
            failed,
            report.readings.len(),
            fragment.name
        );
    }
    report
}

/// Read the fragments in order
pub async fn read_fragments<R>(reader: &R, fragments: &[Fragment]) -> Vec<FragmentReport>
where
    R: RegisterReader + ?Sized,
{
    let mut reports = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        reports.push(read_fragment(reader, fragment).await);
    }
    reports
}

/// Fragment reports followed by the grid and battery keys of `/status`
#[derive(Debug)]
pub struct FragmentCheck {
    pub reports: Vec<FragmentReport>,
    pub status: StatusKeysReport,
}

impl fmt::Display for FragmentCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checking Holding Register Fragments for Protocol 307:")?;
        writeln!(f, "{}", "=".repeat(60))?;
        for report in &self.reports {
            write!(f, "\n{}", report)?;
        }

        writeln!(f, "\n{}", "=".repeat(60))?;
        writeln!(f, "Checking Status JSON:")?;
        writeln!(f, "{}", SECTION_RULE)?;
        write!(f, "{}", self.status)
    }
}

/// Read every fragment, then fetch the status document
pub async fn check_fragments(client: &BridgeClient, fragments: &[Fragment]) -> FragmentCheck {
    let reports = read_fragments(client, fragments).await;
    let status = StatusKeysReport {
        status: client.fetch_status().await,
    };
    FragmentCheck { reports, status }
}
