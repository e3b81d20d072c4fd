//! Fuzz the radar datagram parser: any byte sequence must either parse
//! or be rejected, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vasd_proto::Reading;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Reading::parse(text);
    }
});
