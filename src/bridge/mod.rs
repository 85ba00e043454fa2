// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTTP register bridge module
//!
//! The ShineWiFi stick exposes the inverter's Modbus registers through a web
//! form. This module reads single 16-bit registers through that form; it does
//! not speak Modbus itself.
//!
//! ## Key Components
//!
//! - `RegisterReader`: The seam the probes read registers through.
//! - `BridgeClient`: The reqwest implementation talking to the stick.
//! - `parse_register_value`: Extracts the value from the bridge's answer.
//!
//! ## Wire Format
//!
//! A read is a form-encoded POST to `/postCommunicationModbus_p`:
//!
//! ```text
//! operation=R&registerType=H&type=16b&reg=1080&val=
//! ```
//!
//! `registerType` is `H` for holding registers and `I` for input registers.
//! The answer is plain text ending with the word `value` followed by the
//! register content, e.g. `Read value 2048`.
//!
//! ## Usage
//!
//! ```no_run
//! use shine_probe::bridge::{BridgeClient, RegisterKind, RegisterReader};
//! use shine_probe::config::BridgeConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = BridgeClient::new(&BridgeConfig::default())?;
//! match client.try_read_register(RegisterKind::Input, 118).await {
//!     Some(value) => println!("IR118: {}", value),
//!     None => println!("IR118: <read failed>"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod register;
pub mod response;

pub use client::{BridgeClient, READ_ENDPOINT, STATUS_ENDPOINT};
pub use error::BridgeError;
pub use register::{RegisterAddress, RegisterKind, RegisterReader};
pub use response::parse_register_value;
