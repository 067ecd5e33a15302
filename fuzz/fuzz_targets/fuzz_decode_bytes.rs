#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the DisplayString encoding detection cascade on raw bytes.
fuzz_target!(|data: &[u8]| {
    let _ = mib_tools::decode::decode_bytes(data);
});
