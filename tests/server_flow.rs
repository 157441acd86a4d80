//! End-to-end request/response flow over TCP
//!
//! These tests drive a live server on an ephemeral port through real
//! sockets, covering version negotiation, pipelining, protocol limits,
//! connection ceilings, and graceful shutdown.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use broker_protocol::config::BrokerConfig;
use broker_protocol::transport::tcp::{connect, serve};
use broker_protocol::utils::metrics::global_metrics;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

async fn spawn_server(config: BrokerConfig) -> (SocketAddr, mpsc::Sender<()>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind an ephemeral port");
    let addr = listener.local_addr().expect("Should resolve local addr");
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let handle = tokio::spawn(async move {
        serve(listener, config, shutdown_rx)
            .await
            .expect("Server should run to completion");
    });
    (addr, shutdown_tx, handle)
}

fn api_versions_request(api_version: u16, correlation_id: i32) -> Bytes {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x08, 0x00, 0x12];
    bytes.extend_from_slice(&api_version.to_be_bytes());
    bytes.extend_from_slice(&correlation_id.to_be_bytes());
    Bytes::from(bytes)
}

fn request_for_key(api_key: u16, api_version: u16, correlation_id: i32) -> Bytes {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x08];
    bytes.extend_from_slice(&api_key.to_be_bytes());
    bytes.extend_from_slice(&api_version.to_be_bytes());
    bytes.extend_from_slice(&correlation_id.to_be_bytes());
    Bytes::from(bytes)
}

#[tokio::test]
async fn test_version_negotiation_over_tcp() {
    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    framed
        .send(api_versions_request(4, 7))
        .await
        .expect("Should send request");

    let frame = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");

    assert_eq!(
        frame.as_ref(),
        &[
            0x00, 0x00, 0x00, 0x13, // messageSize 19
            0x00, 0x00, 0x00, 0x07, // correlationId 7
            0x00, 0x00, // errorCode 0
            0x02, // one advertised API
            0x00, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00, // {18, 0..4}
            0x00, 0x00, 0x00, 0x00, // throttleTimeMs
            0x00, // final trailer
        ]
    );
}

#[tokio::test]
async fn test_unsupported_version_answered_in_band() {
    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    framed
        .send(api_versions_request(9, 21))
        .await
        .expect("Should send request");

    let frame = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");

    assert_eq!(frame.len(), 16);
    assert_eq!(&frame.as_ref()[4..8], &21i32.to_be_bytes());
    assert_eq!(&frame.as_ref()[8..10], &[0x00, 0x23]);
}

#[tokio::test]
async fn test_unknown_api_key_gets_empty_success() {
    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    framed
        .send(request_for_key(999, 0, 13))
        .await
        .expect("Should send request");

    let frame = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");

    assert_eq!(frame.len(), 16);
    assert_eq!(&frame.as_ref()[4..8], &13i32.to_be_bytes());
    assert_eq!(&frame.as_ref()[8..10], &[0x00, 0x00]);
}

#[tokio::test]
async fn test_pipelined_requests_share_a_connection() {
    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    // Write all three before reading anything back
    for correlation_id in 1..=3 {
        framed
            .send(api_versions_request(4, correlation_id))
            .await
            .expect("Should send request");
    }

    for correlation_id in 1..=3i32 {
        let frame = timeout(Duration::from_secs(5), framed.next())
            .await
            .expect("Should answer before timeout")
            .expect("Connection should stay open")
            .expect("Response should decode");
        assert_eq!(&frame.as_ref()[4..8], &correlation_id.to_be_bytes());
    }
}

#[tokio::test]
async fn test_truncated_frame_skipped_connection_survives() {
    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    // Ten bytes total: a complete frame, but too short for the fixed header.
    // The server logs it and keeps the connection; no response comes back.
    framed
        .send(Bytes::from_static(&[
            0x00, 0x00, 0x00, 0x06, 0x00, 0x12, 0x00, 0x04, 0x00, 0x00,
        ]))
        .await
        .expect("Should send runt frame");

    framed
        .send(api_versions_request(4, 5))
        .await
        .expect("Should send request");

    let frame = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");
    assert_eq!(&frame.as_ref()[4..8], &5i32.to_be_bytes());
}

#[tokio::test]
async fn test_oversized_declaration_closes_connection() {
    let config = BrokerConfig::default_with_overrides(|c| {
        c.limits.max_message_size = 1024;
    });
    let (addr, _shutdown, _handle) = spawn_server(config).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    // A hostile prefix alone is enough; the body never has to arrive
    framed
        .send(Bytes::from(2048u32.to_be_bytes().to_vec()))
        .await
        .expect("Should send prefix");

    let next = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Server should drop the connection");
    assert!(
        matches!(next, None | Some(Err(_))),
        "Expected a closed connection, got a response"
    );
}

#[tokio::test]
async fn test_connection_ceiling_rejects_excess() {
    let config = BrokerConfig::default_with_overrides(|c| {
        c.server.max_connections = 1;
    });
    let (addr, _shutdown, _handle) = spawn_server(config).await;

    // First connection occupies the only slot
    let mut first = connect(&addr.to_string()).await.expect("Should connect");
    first
        .send(api_versions_request(4, 1))
        .await
        .expect("Should send request");
    let frame = timeout(Duration::from_secs(5), first.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");
    assert_eq!(&frame.as_ref()[4..8], &1i32.to_be_bytes());

    // Second connection is accepted at TCP level, then dropped at the ceiling
    let mut second = connect(&addr.to_string()).await.expect("Should connect");
    let next = timeout(Duration::from_secs(5), second.next())
        .await
        .expect("Server should drop the connection");
    assert!(matches!(next, None | Some(Err(_))));

    // The occupant is unaffected
    first
        .send(api_versions_request(4, 2))
        .await
        .expect("Should send request");
    let frame = timeout(Duration::from_secs(5), first.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");
    assert_eq!(&frame.as_ref()[4..8], &2i32.to_be_bytes());
}

#[tokio::test]
async fn test_idle_timeout_closes_silent_connection() {
    let config = BrokerConfig::default_with_overrides(|c| {
        c.server.idle_timeout = Duration::from_millis(200);
    });
    let (addr, _shutdown, _handle) = spawn_server(config).await;

    let mut framed = connect(&addr.to_string()).await.expect("Should connect");

    // Send nothing; the server should hang up on its own
    let next = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Idle timeout should fire well before five seconds");
    assert!(matches!(next, None | Some(Err(_))));
}

#[tokio::test]
async fn test_graceful_shutdown_drains_active_connection() {
    let config = BrokerConfig::default_with_overrides(|c| {
        c.server.shutdown_timeout = Duration::from_secs(5);
    });
    let (addr, shutdown_tx, handle) = spawn_server(config).await;

    let mut framed = connect(&addr.to_string()).await.expect("Should connect");
    framed
        .send(api_versions_request(4, 1))
        .await
        .expect("Should send request");
    timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");

    shutdown_tx.send(()).await.expect("Should signal shutdown");

    // The established connection is still served while draining
    framed
        .send(api_versions_request(4, 2))
        .await
        .expect("Should send request during drain");
    let frame = timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");
    assert_eq!(&frame.as_ref()[4..8], &2i32.to_be_bytes());

    // Once the last client leaves, the server task completes
    drop(framed);
    timeout(Duration::from_secs(10), handle)
        .await
        .expect("Server should stop after draining")
        .expect("Server task should not panic");
}

#[tokio::test]
async fn test_metrics_observe_traffic() {
    let before = global_metrics().snapshot();

    let (addr, _shutdown, _handle) = spawn_server(BrokerConfig::default()).await;
    let mut framed = connect(&addr.to_string()).await.expect("Should connect");
    framed
        .send(api_versions_request(4, 3))
        .await
        .expect("Should send request");
    timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("Should answer before timeout")
        .expect("Connection should stay open")
        .expect("Response should decode");

    let after = global_metrics().snapshot();
    assert!(after.connections_total > before.connections_total);
    assert!(after.frames_received > before.frames_received);
    assert!(after.responses_sent > before.responses_sent);
    assert!(after.bytes_sent >= before.bytes_sent + 23);
}

#[tokio::test]
async fn test_connect_rejects_unreachable_address() {
    // Nothing listens on the discard port of the loopback interface
    let result = connect("127.0.0.1:9").await;
    assert!(result.is_err());
}
