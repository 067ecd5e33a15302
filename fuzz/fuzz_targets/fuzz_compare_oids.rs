#![no_main]
use libfuzzer_sys::fuzz_target;
use std::cmp::Ordering;

/// Fuzz the OID comparator: it must be antisymmetric on any pair of strings.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (a, b) = s.split_once('|').unwrap_or((s, ""));
        let forward = mib_tools::model::compare_oids(a, b);
        let backward = mib_tools::model::compare_oids(b, a);
        assert_eq!(forward, backward.reverse());
        if a == b {
            assert_eq!(forward, Ordering::Equal);
        }
    }
});
