// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Target value scan
//!
//! Walks a register range and reports the registers whose value equals one
//! of the target values. Used to locate an undocumented setting after
//! writing a recognisable value (99, 990, 08:00, ...) into it from the
//! inverter's display.

use std::fmt;

use log::{debug, info};

use super::time::TimeOfDay;
use super::SECTION_RULE;
use crate::bridge::{RegisterAddress, RegisterKind, RegisterReader};
use crate::config::ScanConfig;

/// What to scan and what to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub kind: RegisterKind,
    pub start: u16,
    /// Last register scanned, inclusive
    pub end: u16,
    pub targets: Vec<u16>,
    /// Emit [`ScanEvent::Progress`] on multiples of this address, `None` to
    /// stay quiet
    pub progress_interval: Option<u16>,
}

impl ScanOptions {
    /// Holding register scan using the configured range and targets
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            kind: RegisterKind::Holding,
            start: config.start,
            end: config.end,
            targets: config.target_values.clone(),
            progress_interval: (config.progress_interval > 0).then_some(config.progress_interval),
        }
    }
}

/// A register holding a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHit {
    pub register: RegisterAddress,
    pub value: u16,
}

impl ScanHit {
    /// Hit line with the value also decoded as a time of day
    pub fn detailed(&self) -> String {
        format!(
            "{}: {} ({}) ← FOUND!",
            self.register,
            self.value,
            TimeOfDay::from_register(self.value)
        )
    }
}

impl fmt::Display for ScanHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.register, self.value)
    }
}

/// Reported while the scan runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    Hit(ScanHit),
    /// The scan went past this register without a hit on it
    Progress(RegisterAddress),
}

/// Result of a finished scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub hits: Vec<ScanHit>,
    /// Registers requested
    pub scanned: usize,
    /// Registers whose read failed and were skipped
    pub failed: usize,
}

impl ScanOutcome {
    /// Hit registers grouped by value, values in the order they were first found
    pub fn grouped(&self) -> Vec<(u16, Vec<RegisterAddress>)> {
        let mut groups: Vec<(u16, Vec<RegisterAddress>)> = Vec::new();
        for hit in &self.hits {
            match groups.iter_mut().find(|(value, _)| *value == hit.value) {
                Some((_, registers)) => registers.push(hit.register),
                None => groups.push((hit.value, vec![hit.register])),
            }
        }
        groups
    }

    /// Summary block listing every hit grouped by value
    pub fn summary(&self) -> ScanSummary<'_> {
        ScanSummary(self)
    }
}

/// Printable summary of a [`ScanOutcome`]
pub struct ScanSummary<'a>(&'a ScanOutcome);

impl fmt::Display for ScanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RESULTS:")?;
        writeln!(f, "{}", SECTION_RULE)?;

        let groups = self.0.grouped();
        if groups.is_empty() {
            return writeln!(f, "No registers found with target values");
        }

        for (value, registers) in groups {
            writeln!(
                f,
                "\nValue {} ({}): {} found",
                value,
                TimeOfDay::from_register(value),
                registers.len()
            )?;
            for register in registers {
                writeln!(f, "  {}", register)?;
            }
        }
        Ok(())
    }
}

/// Scan `options.start..=options.end`, one register at a time.
///
/// Failed reads are skipped without an event. `on_event` sees every hit as
/// soon as it is found, and the progress marks of registers that were not
/// hits.
pub async fn scan_registers<R, F>(reader: &R, options: &ScanOptions, mut on_event: F) -> ScanOutcome
where
    R: RegisterReader + ?Sized,
    F: FnMut(ScanEvent),
{
    info!(
        "Scanning {}{} to {}{} for {:?}",
        options.kind.prefix(),
        options.start,
        options.kind.prefix(),
        options.end,
        options.targets
    );

    let mut outcome = ScanOutcome::default();
    for address in options.start..=options.end {
        let register = RegisterAddress {
            kind: options.kind,
            address,
        };
        outcome.scanned += 1;

        let value = reader.try_read_register(options.kind, address).await;
        match value {
            Some(value) if options.targets.contains(&value) => {
                let hit = ScanHit { register, value };
                debug!("Hit {}", hit);
                outcome.hits.push(hit);
                on_event(ScanEvent::Hit(hit));
                continue;
            }
            Some(_) => {}
            None => outcome.failed += 1,
        }

        if let Some(interval) = options.progress_interval {
            if interval > 0 && address % interval == 0 {
                on_event(ScanEvent::Progress(register));
            }
        }
    }

    info!(
        "Scan finished: {} registers, {} hits, {} failed reads",
        outcome.scanned,
        outcome.hits.len(),
        outcome.failed
    );
    outcome
}
