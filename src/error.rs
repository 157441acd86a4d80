//! # Error Types
//!
//! Comprehensive error handling for the broker wire protocol.
//!
//! This module defines all error variants that can occur during protocol operations,
//! from low-level I/O errors to framing violations and schema lookup defects.
//!
//! ## Error Categories
//! - **I/O Errors**: Network and file system failures
//! - **Framing Errors**: Buffer overflow, oversized declarations, truncated headers
//! - **Schema Errors**: Response structures missing from the registry
//! - **Connection Errors**: Closed or timed-out peers
//!
//! Version-negotiation failures are deliberately absent: an unsupported API
//! version is answered in-band with a well-formed error response, never
//! surfaced as a `ProtocolError`.
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use broker_protocol::error::{ProtocolError, Result};
//!
//! fn declared_len(buf: &[u8]) -> Result<usize> {
//!     if buf.len() < 4 {
//!         return Err(ProtocolError::TruncatedHeader(buf.len()));
//!     }
//!     Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize)
//! }
//!
//! fn main() {
//!     assert!(declared_len(&[0x00, 0x12]).is_err());
//!     assert_eq!(declared_len(&[0, 0, 0, 19, 0xFF]).ok(), Some(19));
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Framing errors
    pub const ERR_BUFFER_OVERFLOW: &str = "Connection buffer exceeds maximum size";
    pub const ERR_OVERSIZED_MESSAGE: &str = "Declared message length exceeds maximum size";
    pub const ERR_TRUNCATED_HEADER: &str = "Frame too short for the fixed request header";

    /// Schema registry errors
    pub const ERR_UNKNOWN_STRUCTURE: &str = "Unknown response structure";

    /// Connection errors
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed";
    pub const ERR_CONNECTION_TIMEOUT: &str = "Connection timed out (no activity)";
    pub const ERR_CONNECTION_LIMIT: &str = "Connection limit reached";
}

// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    /// Accumulated bytes for one connection exceed the configured cap.
    /// Connection-fatal: the stream can no longer be trusted to be
    /// frame-aligned.
    #[error("Connection buffer exceeds maximum size: {0} bytes")]
    BufferOverflow(usize),

    /// A frame's 4-byte length prefix declares a body larger than the
    /// configured per-message cap. Connection-fatal.
    #[error("Declared message length exceeds maximum size: {0} bytes")]
    OversizedMessage(usize),

    /// A frame ended before the minimum fixed request header, or a
    /// variable-length header field declared more bytes than the frame
    /// holds. Aborts that frame only; closing is the caller's call.
    #[error("Frame too short for request header: {0} bytes")]
    TruncatedHeader(usize),

    /// A response schema lookup failed, or a response body was encoded
    /// against a structural variant it does not match. Registry/code
    /// defect, not a runtime condition.
    #[error("Unknown response structure: {0}")]
    UnknownStructure(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection timed out (no activity)")]
    ConnectionTimeout,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
