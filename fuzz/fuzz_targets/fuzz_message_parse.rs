//! Fuzz target: request/response payload parsers
//!
//! Any payload either parses or is rejected with a `LinkError`.  Whatever
//! parses must re-encode into a frame that parses to the same message.
//!
//! cargo fuzz run fuzz_message_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use petdoor::link::message::{encode_request, parse_request, parse_response};

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = parse_request(data) {
        if let Ok(frame) = encode_request(&request) {
            let bytes = frame.as_bytes();
            let again = parse_request(&bytes[1..bytes.len() - 1]);
            assert_eq!(again, Ok(request));
        }
    }

    let _ = parse_response(data);
});
