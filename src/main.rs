// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Entry point of the ShineWiFi register bridge probes
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use shine_probe::bridge::{BridgeClient, RegisterAddress, RegisterKind};
use shine_probe::config::{self, Config};
use shine_probe::probe::{
    check_fragments, check_mode, scan_registers, RegisterReading, ScanEvent, ScanOptions,
    TimeOfDay, SECTION_RULE,
};
use shine_probe::status::StatusListing;

/// Diagnostic probes for the ShineWiFi HTTP-to-Modbus register bridge
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML), created with defaults if missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timeout of a single register read in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    show_config_schema: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read the holding register fragments and the grid/battery status keys
    Fragments {
        /// Bridge host (default: configured host)
        host: Option<String>,
    },

    /// Scan a register range for target values
    Scan {
        /// Bridge host (default: configured host)
        host: Option<String>,

        /// First register (default: 1)
        start: Option<u16>,

        /// Last register, inclusive (default: 1200)
        end: Option<u16>,

        /// Values to look for, comma separated (default: 99,990)
        #[arg(long, value_delimiter = ',')]
        targets: Vec<u16>,

        /// Print progress, decode hits as times and summarize at the end
        #[arg(long)]
        summary: bool,

        /// Scan input registers instead of holding registers
        #[arg(long)]
        input: bool,
    },

    /// Read the current operating mode from IR118 and from the status JSON
    Mode {
        /// Bridge host (default: configured host)
        host: Option<String>,
    },

    /// Read a single register
    Read {
        /// Register address
        register: u16,

        /// Bridge host (default: configured host)
        host: Option<String>,

        /// Read an input register instead of a holding register
        #[arg(long)]
        input: bool,
    },

    /// Print the status JSON of the stick
    Status {
        /// Bridge host (default: configured host)
        host: Option<String>,
    },
}

impl Command {
    fn host(&self) -> Option<String> {
        match self {
            Command::Fragments { host }
            | Command::Scan { host, .. }
            | Command::Mode { host }
            | Command::Read { host, .. }
            | Command::Status { host } => host.clone(),
        }
    }
}

fn kind_of(input: bool) -> RegisterKind {
    if input {
        RegisterKind::Input
    } else {
        RegisterKind::Holding
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let args = Args::parse();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    let Some(command) = args.command else {
        anyhow::bail!("No command given, run with --help to list them");
    };

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let (scan_start, scan_end, targets) = match &command {
        Command::Scan {
            start,
            end,
            targets,
            ..
        } => (
            *start,
            *end,
            (!targets.is_empty()).then(|| targets.clone()),
        ),
        _ => (None, None, None),
    };
    config.apply_args(command.host(), args.timeout_ms, scan_start, scan_end, targets);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);

    let client = BridgeClient::new(&config.bridge)?;

    match command {
        Command::Fragments { .. } => {
            print!("{}", check_fragments(&client, &config.fragments).await)
        }
        Command::Scan { summary, input, .. } => {
            let mut options = ScanOptions::from_config(&config.scan);
            options.kind = kind_of(input);
            run_scan(&client, &config.bridge.host, &options, summary).await
        }
        Command::Mode { .. } => print!("{}", check_mode(&client).await),
        Command::Read {
            register, input, ..
        } => {
            let register = RegisterAddress {
                kind: kind_of(input),
                address: register,
            };
            println!("{}", RegisterReading::read(&client, register).await)
        }
        Command::Status { .. } => print!(
            "{}",
            StatusListing {
                status: client.fetch_status().await
            }
        ),
    }

    Ok(())
}

async fn run_scan(client: &BridgeClient, host: &str, options: &ScanOptions, summary: bool) {
    if !summary {
        let quiet = ScanOptions {
            progress_interval: None,
            ..options.clone()
        };
        scan_registers(client, &quiet, |event| {
            if let ScanEvent::Hit(hit) = event {
                println!("{}", hit);
            }
        })
        .await;
        return;
    }

    let prefix = options.kind.prefix();
    println!(
        "Scanning {}{} to {}{} on {}",
        prefix, options.start, prefix, options.end, host
    );
    println!("Looking for values: {:?}", options.targets);
    let decoded: Vec<String> = options
        .targets
        .iter()
        .map(|v| format!("{} = {} (0x{:04X})", TimeOfDay::from_register(*v), v, v))
        .collect();
    println!("{}", decoded.join(", "));
    println!("{}", SECTION_RULE);

    let outcome = scan_registers(client, options, |event| match event {
        ScanEvent::Hit(hit) => println!("{}", hit.detailed()),
        ScanEvent::Progress(register) => println!("...scanned up to {}", register),
    })
    .await;

    println!("\n{}", "=".repeat(40));
    print!("{}", outcome.summary());
}
