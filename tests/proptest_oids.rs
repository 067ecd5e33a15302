//! Property-based tests for the OID comparator, label formatting and value
//! decoders.
//!
//! Decoders must never panic on arbitrary agent output, and the comparator
//! must behave as a total order over numeric OIDs.

use mib_tools::decode::{decode_bytes, format_value, parse_enum_mapping};
use mib_tools::model::{compare_oids, sort_oids};
use mib_tools::resolve::{format_label, OidResolver};
use mib_tools::store::MemoryNodes;
use mib_tools::{Node, NodeKind};
use proptest::prelude::*;
use std::cmp::Ordering;

fn oid_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..5000, 1..12)
}

fn join(segments: &[u32]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn compare_matches_segment_order(a in oid_strategy(), b in oid_strategy()) {
        // Vec<u32> ordering is lexicographic over numbers, shorter first on ties
        prop_assert_eq!(compare_oids(&join(&a), &join(&b)), a.cmp(&b));
    }

    #[test]
    fn compare_is_antisymmetric(a in oid_strategy(), b in oid_strategy()) {
        let (a, b) = (join(&a), join(&b));
        prop_assert_eq!(compare_oids(&a, &b), compare_oids(&b, &a).reverse());
    }

    #[test]
    fn compare_ignores_leading_dots(a in oid_strategy()) {
        let oid = join(&a);
        prop_assert_eq!(compare_oids(&format!(" .{oid}"), &oid), Ordering::Equal);
    }

    #[test]
    fn numeric_magnitude_wins_over_text(prefix in oid_strategy(), x in 0u32..1000, y in 0u32..1000) {
        prop_assume!(x != y);
        let p = join(&prefix);
        let (small, large) = (x.min(y), x.max(y));
        prop_assert_eq!(
            compare_oids(&format!("{p}.{small}"), &format!("{p}.{large}")),
            Ordering::Less
        );
    }

    #[test]
    fn sorted_oids_are_monotonic(oids in prop::collection::vec(oid_strategy(), 0..30)) {
        let mut strings: Vec<String> = oids.iter().map(|o| join(o)).collect();
        sort_oids(&mut strings);
        for pair in strings.windows(2) {
            prop_assert_ne!(compare_oids(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn label_brackets_non_scalar_suffix(base in "[a-z][A-Za-z0-9]{0,20}", suffix in oid_strategy()) {
        let suffix = join(&suffix);
        let label = format_label(&base, &suffix);
        if suffix == "0" {
            prop_assert_eq!(label, base);
        } else {
            prop_assert_eq!(label, format!("{base}[{suffix}]"));
        }
    }

    #[test]
    fn column_instances_resolve_with_index(index in oid_strategy()) {
        let nodes: MemoryNodes = [Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column)]
            .into_iter()
            .collect();
        let resolver = OidResolver::new(nodes);
        let index = join(&index);
        let label = resolver.resolve_name(&format!("1.3.6.1.2.1.2.2.1.2.{index}"));
        if index == "0" {
            prop_assert_eq!(label, "ifDescr");
        } else {
            prop_assert_eq!(label, format!("ifDescr[{index}]"));
        }
    }
}

proptest! {
    // Decoders only assert no-panic and the raw fallback contract.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn format_value_doesnt_panic(
        raw in "\\PC{0,64}",
        value_type in "(TimeTicks|OctetString|Integer|IpAddress|Counter32)",
        syntax in "(DisplayString|DateAndTime|PhysAddress|InetAddress|BITS \\{ a\\(0\\), b\\(9\\) \\}|INTEGER \\{ up\\(1\\) \\}|TimeStamp|\\PC{0,30})",
    ) {
        let value = format_value(&raw, &value_type, &syntax);
        if !value.formatted {
            prop_assert_eq!(value.text, raw);
        }
    }

    #[test]
    fn hex_payloads_dont_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let raw = format!("0x{}", hex::encode(&bytes));
        for syntax in ["DisplayString", "DateAndTime", "MacAddress", "InetAddress", "BITS { a(0) }"] {
            let _ = format_value(&raw, "OctetString", syntax);
        }
        let _ = decode_bytes(&bytes);
    }

    #[test]
    fn enum_parsing_doesnt_panic(syntax in "\\PC{0,80}") {
        let _ = parse_enum_mapping(&syntax);
    }
}
