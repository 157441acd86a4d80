#![no_main]

use broker_protocol::core::accumulator::FrameAccumulator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz stream reassembly - test for panics, crashes, unbounded growth.
    // Feed the same bytes both whole and in small chunks; limit errors are
    // sticky, so stop a feed once one fires.
    let mut acc = FrameAccumulator::new();
    let _ = acc.push(data);

    let mut acc = FrameAccumulator::new();
    for chunk in data.chunks(3) {
        if acc.push(chunk).is_err() {
            break;
        }
    }
});
