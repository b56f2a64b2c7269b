//! Fuzz target: `FrameDecoder::push`
//!
//! Drives arbitrary byte sequences into the streaming frame decoder and
//! asserts that it never panics, never yields an oversized payload, and
//! recovers cleanly after a reset.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use petdoor::link::codec::{FrameDecoder, MAX_FRAME_LEN, TERMINATOR};

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();

    for &b in data {
        if let Some(Ok(frame)) = decoder.push(b) {
            assert!(frame.payload.len() <= MAX_FRAME_LEN, "payload exceeds MAX_FRAME_LEN");
            assert!(!frame.payload.contains(&TERMINATOR), "terminator leaked into payload");
        }
    }

    // After a reset the decoder must accept a well-formed frame again.
    decoder.reset();
    let mut frames = 0;
    for &b in b"?T;" {
        if let Some(r) = decoder.push(b) {
            assert!(r.is_ok());
            frames += 1;
        }
    }
    assert_eq!(frames, 1);
});
