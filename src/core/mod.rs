//! # Core Framing Components
//!
//! Low-level frame handling over raw byte streams.
//!
//! This module provides the foundation for the protocol: splitting an
//! arbitrarily-chunked byte stream into length-delimited frames and
//! adapting that framing to Tokio transports.
//!
//! ## Components
//! - **Frame**: One complete length-delimited message, prefix included
//! - **FrameAccumulator**: Per-connection reassembly buffer
//! - **FrameCodec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [MessageSize(4, big-endian)] [Payload(MessageSize)]
//! ```
//!
//! ## Safety Limits
//! - Maximum buffered bytes per connection: 1MB (prevents memory exhaustion)
//! - Maximum declared message size: 100KB, checked before the body is buffered
//! - Both violations are connection-fatal

pub mod accumulator;
pub mod codec;
pub mod frame;

pub use accumulator::FrameAccumulator;
pub use codec::FrameCodec;
pub use frame::{Frame, LENGTH_PREFIX_SIZE};
