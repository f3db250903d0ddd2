//! Fuzz target for IRC line parsing
//!
//! Feeds arbitrary input to the parser and the outbound sanitizer and
//! checks that neither panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > slirc_client::MAX_LINE_LEN {
            return;
        }

        let msg = slirc_client::Message::parse(input);
        let _ = msg.to_string();

        let _ = slirc_client::LineCodec::sanitize(input);
    }
});
