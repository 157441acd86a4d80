//! # Frame Accumulator
//!
//! Reassembles complete frames from an arbitrarily-chunked byte stream.
//!
//! TCP delivers bytes, not messages: one read may carry half a frame,
//! three frames, or a frame boundary split mid-prefix. The accumulator
//! owns a growable buffer per connection, appends whatever the socket
//! produced, and drains every complete frame while keeping the
//! unfinished tail for the next read.
//!
//! ## Guarantees
//! - **Boundary independence**: the sequence of frames produced depends
//!   only on the concatenated input bytes, never on how the stream was
//!   chunked into reads.
//! - **Validate before consume**: a frame's declared size is checked
//!   against the message ceiling while the bytes still sit in the
//!   buffer, so a hostile 4-byte prefix is rejected before any body is
//!   buffered for it.
//! - **Zero-copy extraction**: complete frames are split out of the
//!   buffer as [`Bytes`] views, not copied.
//!
//! ## Failure Modes
//! Both limit errors are connection-fatal. The buffer keeps the
//! offending bytes, so a further [`push`](FrameAccumulator::push) fails
//! the same way; the owning connection is expected to close instead.
//! [`clear`](FrameAccumulator::clear) discards everything and returns
//! the accumulator to its initial state.

use bytes::BytesMut;

use crate::config::{LimitsConfig, MAX_BUFFER_SIZE, MAX_MESSAGE_SIZE};
use crate::core::frame::{Frame, LENGTH_PREFIX_SIZE};
use crate::error::{ProtocolError, Result};

/// Per-connection reassembly buffer for length-prefixed frames.
#[derive(Debug)]
pub struct FrameAccumulator {
    buffer: BytesMut,
    max_buffer_size: usize,
    max_message_size: usize,
}

impl FrameAccumulator {
    /// Create an accumulator with the default limits.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            max_buffer_size: MAX_BUFFER_SIZE,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Create an accumulator with limits taken from configuration.
    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_buffer_size: limits.max_buffer_size,
            max_message_size: limits.max_message_size,
        }
    }

    /// Append a chunk from the stream and drain every complete frame.
    ///
    /// Returns the frames that became complete with this chunk, in
    /// stream order; an empty vector means the buffered bytes do not
    /// yet form a full frame. Partial bytes stay buffered for the next
    /// call.
    ///
    /// # Errors
    /// - [`ProtocolError::BufferOverflow`] if buffered bytes would
    ///   exceed the per-connection buffer ceiling.
    /// - [`ProtocolError::OversizedMessage`] if a frame prefix declares
    ///   a size above the per-message ceiling. Detected from the prefix
    ///   alone, before the body arrives.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > self.max_buffer_size {
            return Err(ProtocolError::BufferOverflow(self.buffer.len()));
        }

        let mut frames = Vec::new();
        while let Some(frame) = try_extract_frame(&mut self.buffer, self.max_message_size)? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Number of bytes currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no partial frame is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard all buffered bytes and reset to the initial state.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Try to split one complete frame off the front of `buffer`.
///
/// Peeks the 4-byte size prefix without consuming it, so an incomplete
/// frame leaves the buffer untouched. Shared by the accumulator and the
/// tokio codec so both paths frame identically.
pub(crate) fn try_extract_frame(
    buffer: &mut BytesMut,
    max_message_size: usize,
) -> Result<Option<Frame>> {
    if buffer.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }

    let declared = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    if declared > max_message_size {
        return Err(ProtocolError::OversizedMessage(declared));
    }

    let total = LENGTH_PREFIX_SIZE + declared;
    if buffer.len() < total {
        return Ok(None);
    }

    let frame_bytes = buffer.split_to(total).freeze();
    Frame::new(frame_bytes).map(Some)
}
