//! # Broker Protocol
//!
//! Length-prefixed broker wire protocol engine for Rust services.
//!
//! The crate turns an unbounded, arbitrarily-chunked byte stream into
//! discrete request frames, decodes them, negotiates API versions, and
//! encodes schema-described responses: the request/response core of a
//! broker-style RPC server.
//!
//! ## Architecture
//! ```text
//! stream bytes → FrameAccumulator → Frame → decode → Request
//!     → ApiDispatcher → Response → encode → wire bytes → socket
//! ```
//!
//! - [`core`]: frame reassembly, the frame type, and a Tokio codec
//!   for `Framed` transports
//! - [`protocol`]: messages, response schemas, the wire codec,
//!   dispatch, and the engine tying them together
//! - [`transport`]: TCP accept loop, connection ceiling, idle
//!   timeouts, and graceful shutdown
//! - [`config`]: TOML and environment configuration with validation
//! - [`utils`]: logging setup and runtime metrics
//!
//! ## Safety Properties
//! - Frames are reassembled independently of how the stream was
//!   chunked into reads
//! - Hostile length prefixes are rejected from the prefix alone,
//!   before any body-sized buffering
//! - Version negotiation failures are answered in-band with a
//!   well-formed error response, never a dropped connection
//!
//! ## Quick Start
//! ```no_run
//! use broker_protocol::config::BrokerConfig;
//! use broker_protocol::error::Result;
//! use broker_protocol::transport::tcp;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = BrokerConfig::default();
//!     tcp::start_server(config).await
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use config::BrokerConfig;
pub use core::{Frame, FrameAccumulator, FrameCodec};
pub use error::{ProtocolError, Result};
pub use protocol::ProtocolEngine;
