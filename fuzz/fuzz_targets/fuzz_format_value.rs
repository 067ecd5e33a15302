#![no_main]
use libfuzzer_sys::fuzz_target;

const SYNTAXES: &[&str] = &[
    "TimeTicks",
    "DateAndTime",
    "PhysAddress",
    "InetAddress",
    "BITS { up(0), down(1), testing(9) }",
    "INTEGER { up(1), down(2) }",
    "DisplayString",
];

/// Fuzz the value decoder with every syntax family.
///
/// The first line of input is the raw value, the rest is an extra syntax
/// string tried after the fixed ones.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (raw, extra) = s.split_once('\n').unwrap_or((s, ""));
        for syntax in SYNTAXES.iter().copied().chain(std::iter::once(extra)) {
            let value = mib_tools::decode::format_value(raw, "OctetString", syntax);
            if !value.formatted {
                assert_eq!(value.text, raw);
            }
        }
    }
});
