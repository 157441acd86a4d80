use broker_protocol::{
    core::accumulator::FrameAccumulator, protocol::engine::ProtocolEngine, protocol::wire,
};

#[test]
fn stress_frame_reassembly_large_series() {
    // Simulate a heavy burst of frames, ensure no panics and no leftover bytes
    let mut acc = FrameAccumulator::new();

    for size in [0usize, 1, 64, 512, 4096, 65536] {
        let mut bytes = (size as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(&vec![0u8; size]);

        for _ in 0..10_000 {
            let frames = acc.push(&bytes).unwrap();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0].declared_size() as usize, size);
        }
        assert!(acc.is_empty());
    }
}

#[test]
fn stress_pipelined_burst_single_push() {
    // One push carrying thousands of back-to-back requests must yield
    // every frame in order
    let count = 10_000i32;
    let mut stream = Vec::with_capacity(count as usize * 12);
    for i in 0..count {
        stream.extend_from_slice(&[0x00, 0x00, 0x00, 0x08, 0x00, 0x12, 0x00, 0x04]);
        stream.extend_from_slice(&i.to_be_bytes());
    }

    let mut acc = FrameAccumulator::new();
    let frames = acc.push(&stream).unwrap();
    assert_eq!(frames.len(), count as usize);
    assert!(acc.is_empty());

    for (i, frame) in frames.iter().enumerate() {
        let request = wire::decode_request(frame).unwrap();
        assert_eq!(request.header.correlation_id, i as i32);
    }
}

#[test]
fn stress_dispatch_large_series() {
    let engine = ProtocolEngine::new();

    for i in 0..50_000i32 {
        let mut bytes = vec![0x00, 0x00, 0x00, 0x08, 0x00, 0x12, 0x00, 0x04];
        bytes.extend_from_slice(&i.to_be_bytes());
        let frames = FrameAccumulator::new().push(&bytes).unwrap();
        let response = engine.handle_frame(&frames[0]).unwrap();
        assert_eq!(response.len(), 23);
    }
}
