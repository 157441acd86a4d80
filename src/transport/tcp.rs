//! # TCP Transport
//!
//! Socket-accept loop and per-connection workers over TCP.
//!
//! The transport owns everything the protocol engine does not: binding
//! the listener, the connection counter and its ceiling, idle
//! timeouts, and writing encoded responses back to the peer. Each
//! accepted connection gets one worker task; a worker drives its own
//! [`Framed`] stream, so no connection ever touches another's buffer.
//!
//! ## Error Policy
//! - Framing violations (buffer overflow, oversized declaration) and
//!   I/O errors close the connection; the stream is no longer
//!   frame-aligned.
//! - A truncated request header aborts that frame only; the worker
//!   keeps serving the connection.
//! - Schema lookup failures are wiring defects; the worker logs them
//!   loudly and closes.

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{BrokerConfig, LimitsConfig};
use crate::core::codec::FrameCodec;
use crate::error::{ProtocolError, Result};
use crate::protocol::engine::ProtocolEngine;
use crate::utils::metrics::global_metrics;
use crate::utils::timeout::DRAIN_POLL_INTERVAL;

/// Start a broker server on the configured address.
///
/// Installs a CTRL+C handler and runs until the signal arrives, then
/// drains connections gracefully.
#[instrument(skip(config), fields(address = %config.server.address))]
pub async fn start_server(config: BrokerConfig) -> Result<()> {
    // Create internal shutdown channel
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

    // Set up ctrl-c handler that sends to our internal shutdown channel
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received CTRL+C signal, shutting down");
            let _ = shutdown_tx_clone.send(()).await;
        }
    });

    start_server_with_shutdown(config, shutdown_rx).await
}

/// Start a broker server with an external shutdown channel.
#[instrument(skip(config, shutdown_rx), fields(address = %config.server.address))]
pub async fn start_server_with_shutdown(
    config: BrokerConfig,
    shutdown_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let listener = TcpListener::bind(&config.server.address).await?;
    serve(listener, config, shutdown_rx).await
}

/// Run the accept loop on an already-bound listener.
///
/// Enforces the concurrent-connection ceiling: when the counter is at
/// the limit, a freshly accepted socket is dropped immediately instead
/// of being handed a worker.
pub async fn serve(
    listener: TcpListener,
    config: BrokerConfig,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, "Listening for broker connections");

    let engine = Arc::new(ProtocolEngine::new());
    let max_connections = config.server.max_connections;
    let idle_timeout = config.server.idle_timeout;
    let shutdown_timeout = config.server.shutdown_timeout;
    let limits = config.limits;

    // Track active connections
    let active_connections = Arc::new(Mutex::new(0usize));

    // Server main loop with graceful shutdown
    loop {
        tokio::select! {
            // Check for shutdown signal from the provided shutdown_rx channel
            _ = shutdown_rx.recv() => {
                info!("Shutting down server. Waiting for connections to close...");

                // Wait for active connections to close (with timeout)
                let timeout = tokio::time::sleep(shutdown_timeout);
                tokio::pin!(timeout);

                loop {
                    tokio::select! {
                        _ = &mut timeout => {
                            warn!("Shutdown timeout reached, forcing exit");
                            break;
                        }
                        _ = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {
                            let connections = *active_connections.lock().await;
                            info!(connections = %connections, "Waiting for connections to close");
                            if connections == 0 {
                                info!("All connections closed, shutting down");
                                break;
                            }
                        }
                    }
                }

                return Ok(());
            }

            // Accept new connections
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        let active_connections = active_connections.clone();

                        // Enforce the connection ceiling before spawning a worker
                        {
                            let mut count = active_connections.lock().await;
                            if *count >= max_connections {
                                warn!(peer = %peer, limit = max_connections, "Connection limit reached, rejecting");
                                global_metrics().connection_rejected();
                                continue;
                            }
                            *count += 1;
                        }

                        global_metrics().connection_established();
                        info!(peer = %peer, "New connection established");

                        let engine = engine.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, engine, limits, idle_timeout).await;

                            // Decrement connection counter when connection closes
                            let mut count = active_connections.lock().await;
                            *count -= 1;
                            global_metrics().connection_closed();
                            info!(peer = %peer, "Connection closed");
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "Error accepting connection");
                    }
                }
            }
        }
    }
}

/// Serve one connection until the peer disconnects, goes idle, or the
/// stream can no longer be trusted.
#[instrument(skip(stream, engine, limits, idle_timeout), fields(peer = %peer))]
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    engine: Arc<ProtocolEngine>,
    limits: LimitsConfig,
    idle_timeout: Duration,
) {
    let mut framed = Framed::new(stream, FrameCodec::with_limits(limits));

    loop {
        let next = tokio::time::timeout(idle_timeout, framed.next()).await;
        match next {
            Err(_) => {
                info!("Idle timeout, closing connection");
                break;
            }
            Ok(None) => {
                debug!("Peer disconnected");
                break;
            }
            Ok(Some(Ok(frame))) => {
                global_metrics().frame_received(frame.len() as u64);

                match engine.handle_frame(&frame) {
                    Ok(response) => {
                        let response_len = response.len() as u64;
                        if let Err(e) = framed.send(response).await {
                            error!(error = %e, "Failed to write response");
                            global_metrics().connection_error();
                            break;
                        }
                        global_metrics().response_sent(response_len);
                    }
                    // Truncated header aborts the frame, not the connection
                    Err(ProtocolError::TruncatedHeader(len)) => {
                        warn!(bytes = len, "Dropping truncated request frame");
                        global_metrics().protocol_error();
                    }
                    Err(e) => {
                        error!(error = %e, "Protocol failure, closing connection");
                        global_metrics().protocol_error();
                        break;
                    }
                }
            }
            Ok(Some(Err(e))) => {
                match e {
                    ProtocolError::BufferOverflow(_) | ProtocolError::OversizedMessage(_) => {
                        warn!(error = %e, "Framing violation, closing connection");
                        global_metrics().protocol_error();
                    }
                    other => {
                        error!(error = %other, "Stream error, closing connection");
                        global_metrics().connection_error();
                    }
                }
                break;
            }
        }
    }
}

/// Connect to a broker and wrap the stream in the frame codec.
#[instrument(skip(addr))]
pub async fn connect(addr: &str) -> Result<Framed<TcpStream, FrameCodec>> {
    let stream = TcpStream::connect(addr).await?;
    Ok(Framed::new(stream, FrameCodec::new()))
}
