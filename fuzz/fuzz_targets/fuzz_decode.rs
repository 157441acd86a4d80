#![no_main]

use broker_protocol::core::frame::Frame;
use broker_protocol::protocol::engine::ProtocolEngine;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz request decoding and the full dispatch pipeline
    if let Ok(frame) = Frame::new(Bytes::copy_from_slice(data)) {
        let engine = ProtocolEngine::new();
        // Every outcome must be a response or a typed error, never a panic
        let _ = engine.handle_frame(&frame);
    }
});
