// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Tests for the BridgeClient implementation
//!
//! These tests start a mock ShineWiFi bridge with wiremock and check the
//! requests the client sends and how it handles good answers, error statuses,
//! malformed bodies, timeouts and unreachable hosts.

use std::time::Duration;

use serde_json::json;
use shine_probe::bridge::client::encode_read_form;
use shine_probe::bridge::{BridgeClient, BridgeError, RegisterKind, RegisterReader};
use shine_probe::config::BridgeConfig;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, read_timeout_ms: u64) -> BridgeClient {
    let config = BridgeConfig {
        host: server.uri(),
        read_timeout_ms,
        status_timeout_ms: 1000,
    };
    BridgeClient::new(&config).unwrap()
}

async fn mount_register(server: &MockServer, kind: RegisterKind, address: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/postCommunicationModbus_p"))
        .and(body_string(encode_read_form(kind, address).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_read_holding_register_sends_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCommunicationModbus_p"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "operation=R&registerType=H&type=16b&reg=1080&val=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("Read value 2048"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 2000);
    let value = client
        .read_register(RegisterKind::Holding, 1080)
        .await
        .unwrap();

    assert_eq!(value, 2048);
}

#[tokio::test]
async fn test_read_input_register() {
    let server = MockServer::start().await;
    mount_register(&server, RegisterKind::Input, 118, "...value 2").await;

    let client = client_for(&server, 2000);

    assert_eq!(
        client.try_read_register(RegisterKind::Input, 118).await,
        Some(2)
    );
    // Same address as a holding register is not mocked
    assert_eq!(
        client.try_read_register(RegisterKind::Holding, 118).await,
        None
    );
}

#[tokio::test]
async fn test_non_200_is_a_failed_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCommunicationModbus_p"))
        .respond_with(ResponseTemplate::new(500).set_body_string("value 12"))
        .mount(&server)
        .await;

    let client = client_for(&server, 2000);

    let err = client
        .read_register(RegisterKind::Holding, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Status(status) if status.as_u16() == 500));
    assert_eq!(client.try_read_register(RegisterKind::Holding, 3).await, None);
}

#[tokio::test]
async fn test_malformed_body_is_a_failed_read() {
    let server = MockServer::start().await;
    mount_register(&server, RegisterKind::Holding, 45, "Modbus timeout").await;
    mount_register(&server, RegisterKind::Holding, 46, "value n/a").await;

    let client = client_for(&server, 2000);

    assert!(matches!(
        client.read_register(RegisterKind::Holding, 45).await,
        Err(BridgeError::MissingValue { .. })
    ));
    assert!(matches!(
        client.read_register(RegisterKind::Holding, 46).await,
        Err(BridgeError::InvalidValue { .. })
    ));
    assert_eq!(client.try_read_register(RegisterKind::Holding, 46).await, None);
}

#[tokio::test]
async fn test_timeout_is_a_failed_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postCommunicationModbus_p"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("value 99")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 100);

    let err = client
        .read_register(RegisterKind::Holding, 1)
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected a timeout, got {err}");
    assert_eq!(client.try_read_register(RegisterKind::Holding, 1).await, None);
}

#[tokio::test]
async fn test_unreachable_host_is_a_failed_read() {
    // Grab a free port and release it so nothing listens there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = BridgeConfig {
        host: format!("127.0.0.1:{}", port),
        read_timeout_ms: 1000,
        status_timeout_ms: 1000,
    };
    let client = BridgeClient::new(&config).unwrap();

    assert_eq!(client.try_read_register(RegisterKind::Holding, 1).await, None);
    assert!(client.fetch_status().await.is_err());
}

#[tokio::test]
async fn test_fetch_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "CurrentMode": 2,
            "GridFirstPwrRate": 100,
            "BattFirstSOC": 95
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, 2000);
    let status = client.fetch_status().await.unwrap();

    assert_eq!(status.len(), 3);
    assert_eq!(status.current_mode().unwrap().to_string(), "2 = Grid-first");
}

#[tokio::test]
async fn test_fetch_status_rejects_non_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["CurrentMode"])))
        .mount(&server)
        .await;

    let client = client_for(&server, 2000);

    assert!(matches!(
        client.fetch_status().await,
        Err(BridgeError::StatusNotObject)
    ));
}

#[test]
fn test_invalid_host_is_rejected() {
    let config = BridgeConfig {
        host: "ftp://inverter".to_string(),
        ..BridgeConfig::default()
    };
    assert!(matches!(
        BridgeClient::new(&config),
        Err(BridgeError::InvalidHost { .. })
    ));
}
