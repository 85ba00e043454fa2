// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! reqwest client for the ShineWiFi register bridge

use std::net::Ipv6Addr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use super::{parse_register_value, BridgeError, RegisterAddress, RegisterKind, RegisterReader};
use crate::config::BridgeConfig;
use crate::status::StatusSnapshot;

/// Path of the register read form
pub const READ_ENDPOINT: &str = "postCommunicationModbus_p";

/// Path of the JSON status document
pub const STATUS_ENDPOINT: &str = "status";

/// Form fields of a single 16-bit register read
#[derive(Debug, Serialize)]
struct ReadForm<'a> {
    operation: &'static str,
    #[serde(rename = "registerType")]
    register_type: &'static str,
    #[serde(rename = "type")]
    width: &'static str,
    reg: &'a str,
    val: &'static str,
}

impl<'a> ReadForm<'a> {
    fn new(kind: RegisterKind, reg: &'a str) -> Self {
        Self {
            operation: "R",
            register_type: kind.form_code(),
            width: "16b",
            reg,
            val: "",
        }
    }
}

/// Encode the form body of a register read.
///
/// ```
/// use shine_probe::bridge::{client::encode_read_form, RegisterKind};
///
/// let body = encode_read_form(RegisterKind::Holding, 1080).unwrap();
/// assert_eq!(body, "operation=R&registerType=H&type=16b&reg=1080&val=");
/// ```
pub fn encode_read_form(kind: RegisterKind, address: u16) -> Result<String, BridgeError> {
    let reg = address.to_string();
    Ok(serde_urlencoded::to_string(ReadForm::new(kind, &reg))?)
}

/// Turn a configured host into the base URL of the bridge.
///
/// Bare hosts are reached over plain HTTP; explicit `http://`/`https://`
/// URLs are kept, including any path prefix.
pub fn base_url(host: &str) -> Result<Url, BridgeError> {
    let host = host.trim();
    let invalid = |reason: String| BridgeError::InvalidHost {
        host: host.to_string(),
        reason,
    };

    if host.is_empty() {
        return Err(invalid("host is empty".to_string()));
    }

    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else if host.contains("://") {
        return Err(invalid("only http and https are supported".to_string()));
    } else if host.parse::<Ipv6Addr>().is_ok() {
        format!("http://[{}]", host)
    } else {
        format!("http://{}", host)
    };

    let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("no host name".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Client of the HTTP-to-Modbus bridge.
///
/// Requests are issued one at a time by the caller; the underlying
/// connection pool is reused between them.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    read_endpoint: Url,
    status_endpoint: Url,
    read_timeout: Duration,
    status_timeout: Duration,
}

impl BridgeClient {
    /// Create a client for the bridge described by `config`
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let base = base_url(&config.host)?;
        let join = |path: &str| {
            base.join(path).map_err(|e| BridgeError::InvalidHost {
                host: config.host.clone(),
                reason: e.to_string(),
            })
        };
        let read_endpoint = join(READ_ENDPOINT)?;
        let status_endpoint = join(STATUS_ENDPOINT)?;

        let http = reqwest::Client::builder()
            .user_agent(format!("shine-probe/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!("Register bridge at {}", base);

        Ok(Self {
            http,
            read_endpoint,
            status_endpoint,
            read_timeout: Duration::from_millis(config.read_timeout_ms),
            status_timeout: Duration::from_millis(config.status_timeout_ms),
        })
    }

    /// Fetch the `/status` JSON document of the stick
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, BridgeError> {
        debug!("GET {}", self.status_endpoint);
        let response = self
            .http
            .get(self.status_endpoint.clone())
            .timeout(self.status_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(BridgeError::Status(response.status()));
        }

        let document: serde_json::Value = response.json().await?;
        StatusSnapshot::from_value(document)
    }
}

#[async_trait]
impl RegisterReader for BridgeClient {
    async fn read_register(&self, kind: RegisterKind, address: u16) -> Result<u16, BridgeError> {
        let register = RegisterAddress { kind, address };
        let body = encode_read_form(kind, address)?;
        debug!("POST {} reading {}", self.read_endpoint, register);

        let response = self
            .http
            .post(self.read_endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .timeout(self.read_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(BridgeError::Status(response.status()));
        }

        let text = response.text().await?;
        let value = parse_register_value(&text)?;
        debug!("{} = {}", register, value);
        Ok(value)
    }
}
