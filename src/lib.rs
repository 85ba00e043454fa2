// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! ShineWiFi register bridge probes
//!
//! This library provides the pieces of the `shine_probe` diagnostic tool:
//! reading single Modbus registers of a Growatt inverter through the
//! ShineWiFi stick's HTTP form, and printing them for a human.

pub mod bridge;
pub mod config;
pub mod probe;
pub mod status;
