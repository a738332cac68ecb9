// File: transport_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use common::{contains, refused_port, start_stub, Reply};
use rsmuggle::errors::TransportError;
use rsmuggle::payloads;
use rsmuggle::target::Target;
use rsmuggle::transport::{Transport, TransportConfig};
use std::time::{Duration, Instant};

fn transport() -> Transport {
    Transport::new(TransportConfig {
        skip_certificate_verification: true,
        ..TransportConfig::default()
    })
    .unwrap()
}

fn te_cl_payload() -> Vec<u8> {
    payloads::build("127.0.0.1", "/").remove(0).raw_bytes
}

#[tokio::test]
async fn test_refused_port_is_connection_failure() {
    let port = refused_port().await;
    let target = Target::plain("127.0.0.1", Some(port)).unwrap();

    let result = transport()
        .send(&target, &te_cl_payload(), Duration::from_secs(2))
        .await;

    match result {
        Err(TransportError::Connect(e)) => assert!(!e.to_string().is_empty()),
        other => panic!("expected connect failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_response_until_close() {
    let mut stub = start_stub(|_| {
        Reply::Full(b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n".to_vec())
    })
    .await;
    let target = Target::plain("127.0.0.1", Some(stub.port)).unwrap();
    let payload = te_cl_payload();

    let started = Instant::now();
    let response = transport()
        .send(&target, &payload, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(
        response,
        b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n"
    );
    // Close ends the drain well before the idle timeout.
    assert!(started.elapsed() < Duration::from_secs(4));

    let received = stub.requests.recv().await.unwrap();
    assert_eq!(received, payload);
}

#[tokio::test]
async fn test_partial_response_then_stall_returns_partial_bytes() {
    let stub = start_stub(|_| {
        Reply::PartialThenStall(b"HTTP/1.1 200 OK\r\nX-Par".to_vec(), Duration::from_secs(5))
    })
    .await;
    let target = Target::plain("127.0.0.1", Some(stub.port)).unwrap();

    let timeout = Duration::from_millis(500);
    let started = Instant::now();
    let response = transport()
        .send(&target, &te_cl_payload(), timeout)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response, b"HTTP/1.1 200 OK\r\nX-Par");
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_millis(1500), "{:?}", elapsed);
}

#[tokio::test]
async fn test_peer_closing_silently_is_empty_success() {
    let stub = start_stub(|_| Reply::Close).await;
    let target = Target::plain("127.0.0.1", Some(stub.port)).unwrap();

    let response = transport()
        .send(&target, &te_cl_payload(), Duration::from_secs(2))
        .await
        .unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_tls_against_plain_server_is_handshake_failure() {
    let stub = start_stub(|_| Reply::Full(b"HTTP/1.1 400 Bad Request\r\n\r\n".to_vec())).await;
    let target = Target::secure("127.0.0.1", Some(stub.port)).unwrap();

    let result = transport()
        .send(&target, &te_cl_payload(), Duration::from_secs(2))
        .await;

    assert!(matches!(result, Err(TransportError::Handshake(_))), "{:?}", result);
}

#[tokio::test]
async fn test_each_send_uses_fresh_connection() {
    let mut stub = start_stub(|request| {
        if contains(request, "Transfer-Encoding: cow") {
            Reply::Close
        } else {
            Reply::Full(b"HTTP/1.1 200 OK\r\n\r\n".to_vec())
        }
    })
    .await;
    let target = Target::plain("127.0.0.1", Some(stub.port)).unwrap();
    let transport = transport();

    for variant in payloads::build("127.0.0.1", "/") {
        transport
            .send(&target, &variant.raw_bytes, Duration::from_secs(2))
            .await
            .unwrap();
        let received = stub.requests.recv().await.unwrap();
        assert_eq!(received, variant.raw_bytes, "{}", variant.name);
    }
}
