// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register kinds and the register reader seam

use std::fmt;

use async_trait::async_trait;
use log::debug;

use super::BridgeError;

/// Modbus register class addressed through the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    /// Read/write configuration registers
    Holding,
    /// Read-only live values
    Input,
}

impl RegisterKind {
    /// Value of the `registerType` form field
    pub fn form_code(self) -> &'static str {
        match self {
            RegisterKind::Holding => "H",
            RegisterKind::Input => "I",
        }
    }

    /// Prefix used when printing an address, `HR` or `IR`
    pub fn prefix(self) -> &'static str {
        match self {
            RegisterKind::Holding => "HR",
            RegisterKind::Input => "IR",
        }
    }
}

/// A register of a given kind, printed as `HR1080` or `IR118`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterAddress {
    pub kind: RegisterKind,
    pub address: u16,
}

impl RegisterAddress {
    pub fn holding(address: u16) -> Self {
        Self {
            kind: RegisterKind::Holding,
            address,
        }
    }

    pub fn input(address: u16) -> Self {
        Self {
            kind: RegisterKind::Input,
            address,
        }
    }
}

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.address)
    }
}

/// Something that can read one 16-bit register at a time.
///
/// Implemented by [`super::BridgeClient`] for the real device; tests provide
/// in-memory readers.
#[async_trait]
pub trait RegisterReader: Send + Sync {
    /// Read one register, reporting why the read failed.
    async fn read_register(&self, kind: RegisterKind, address: u16) -> Result<u16, BridgeError>;

    /// Read one register, turning every failure into `None`.
    ///
    /// Timeouts, connection failures, unexpected HTTP statuses and malformed
    /// answers are all treated the same way.
    async fn try_read_register(&self, kind: RegisterKind, address: u16) -> Option<u16> {
        let register = RegisterAddress { kind, address };
        match self.read_register(kind, address).await {
            Ok(value) => Some(value),
            Err(e) if e.is_timeout() => {
                debug!("Read of {} timed out", register);
                None
            }
            Err(e) => {
                debug!("Read of {} failed: {}", register, e);
                None
            }
        }
    }
}
