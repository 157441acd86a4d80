//! # Tokio Codec
//!
//! [`Decoder`]/[`Encoder`] implementation that adapts the frame
//! accumulator to `tokio_util`'s [`Framed`] transport.
//!
//! The decoder shares its extraction routine with
//! [`FrameAccumulator`](crate::core::accumulator::FrameAccumulator), so
//! a connection driven through [`Framed`] observes exactly the same
//! frame boundaries and limit errors as one fed through the
//! accumulator by hand.
//!
//! Outbound responses arrive as complete wire images, size prefix
//! already in place; the encoder appends them untouched.
//!
//! [`Framed`]: tokio_util::codec::Framed

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::{LimitsConfig, MAX_BUFFER_SIZE, MAX_MESSAGE_SIZE};
use crate::core::accumulator::try_extract_frame;
use crate::core::frame::Frame;
use crate::error::ProtocolError;

/// Frame codec for length-prefixed messages over a byte stream.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_buffer_size: usize,
    max_message_size: usize,
}

impl FrameCodec {
    /// Create a codec with the default limits.
    pub fn new() -> Self {
        Self {
            max_buffer_size: MAX_BUFFER_SIZE,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Create a codec with limits taken from configuration.
    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self {
            max_buffer_size: limits.max_buffer_size,
            max_message_size: limits.max_message_size,
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, ProtocolError> {
        if src.len() > self.max_buffer_size {
            return Err(ProtocolError::BufferOverflow(src.len()));
        }
        try_extract_frame(src, self.max_message_size)
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.reserve(item.len());
        dst.extend_from_slice(&item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame_bytes(body: &[u8]) -> Vec<u8> {
        let mut bytes = (body.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_decode_complete_frame() {
        let mut codec = FrameCodec::new();
        let mut src = BytesMut::from(&make_frame_bytes(&[0x00, 0x12, 0x00, 0x04])[..]);

        let frame = codec.decode(&mut src).expect("decode").expect("frame");

        assert_eq!(frame.declared_size(), 4);
        assert_eq!(frame.body(), &[0x00, 0x12, 0x00, 0x04]);
        assert!(src.is_empty());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_decode_partial_frame_leaves_buffer() {
        let mut codec = FrameCodec::new();
        let bytes = make_frame_bytes(&[0xAA; 8]);
        let mut src = BytesMut::from(&bytes[..6]);

        assert!(codec.decode(&mut src).expect("decode").is_none());
        assert_eq!(src.len(), 6);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_decode_drains_frames_one_per_call() {
        let mut codec = FrameCodec::new();
        let mut stream = make_frame_bytes(&[0x01; 4]);
        stream.extend_from_slice(&make_frame_bytes(&[0x02; 4]));
        let mut src = BytesMut::from(&stream[..]);

        let first = codec.decode(&mut src).expect("decode").expect("frame");
        let second = codec.decode(&mut src).expect("decode").expect("frame");

        assert_eq!(first.body(), &[0x01; 4]);
        assert_eq!(second.body(), &[0x02; 4]);
        assert!(codec.decode(&mut src).expect("decode").is_none());
    }

    #[test]
    fn test_decode_rejects_oversized_declaration() {
        let limits = LimitsConfig {
            max_buffer_size: MAX_BUFFER_SIZE,
            max_message_size: 512,
        };
        let mut codec = FrameCodec::with_limits(limits);
        let mut src = BytesMut::from(&1024u32.to_be_bytes()[..]);

        match codec.decode(&mut src) {
            Err(ProtocolError::OversizedMessage(1024)) => {}
            other => panic!("expected OversizedMessage(1024), got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_overflowed_buffer() {
        let limits = LimitsConfig {
            max_buffer_size: 16,
            max_message_size: 512,
        };
        let mut codec = FrameCodec::with_limits(limits);
        let mut src = BytesMut::from(&[0u8; 32][..]);

        match codec.decode(&mut src) {
            Err(ProtocolError::BufferOverflow(32)) => {}
            other => panic!("expected BufferOverflow(32), got {other:?}"),
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_encode_is_passthrough() {
        let mut codec = FrameCodec::new();
        let wire = Bytes::from_static(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x07]);
        let mut dst = BytesMut::new();

        codec.encode(wire.clone(), &mut dst).expect("encode");

        assert_eq!(&dst[..], &wire[..]);
    }
}
