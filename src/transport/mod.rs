//! # Transport Layer
//!
//! Socket ownership around the protocol core.
//!
//! The protocol engine never touches a socket: this layer accepts
//! connections, enforces the connection ceiling and idle timeout,
//! feeds complete frames into the engine, and writes the encoded
//! responses back out.
//!
//! ## Components
//! - **tcp**: TCP listener, per-connection workers, graceful shutdown

pub mod tcp;

pub use tcp::{connect, serve, start_server, start_server_with_shutdown};
