//! # Frame Type
//!
//! A single length-delimited message lifted out of the byte stream.
//!
//! Every frame starts with a 4-byte big-endian size prefix. The prefix
//! declares how many bytes follow it, so a complete frame always spans
//! `4 + declared_size` bytes. Frames produced by the accumulator keep the
//! prefix in place: downstream decoding reads every field at a fixed
//! offset from the start of the frame, prefix included.
//!
//! Frames are backed by [`bytes::Bytes`], so slicing one out of the
//! receive buffer never copies the payload.

use bytes::Bytes;

use crate::error::{ProtocolError, Result};

/// Width of the size prefix that opens every frame.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// One complete length-delimited message, size prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap an assembled frame.
    ///
    /// The buffer must be at least [`LENGTH_PREFIX_SIZE`] bytes so the
    /// declared size can be read; anything shorter fails with
    /// [`ProtocolError::TruncatedHeader`]. The declared size is *not*
    /// required to match the buffer length: decoding works from fixed
    /// offsets and tolerates senders that misreport the prefix.
    pub fn new(bytes: Bytes) -> Result<Self> {
        if bytes.len() < LENGTH_PREFIX_SIZE {
            return Err(ProtocolError::TruncatedHeader(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// The message size the sender declared in the 4-byte prefix.
    pub fn declared_size(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Bytes after the size prefix.
    pub fn body(&self) -> &[u8] {
        &self.bytes[LENGTH_PREFIX_SIZE..]
    }

    /// The whole frame, prefix included.
    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume the frame and take its backing buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Total length in bytes, prefix included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the frame holds nothing beyond an empty buffer.
    ///
    /// Cannot occur for frames built through [`Frame::new`], which
    /// requires at least the size prefix.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
