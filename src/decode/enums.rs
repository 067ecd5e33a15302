//! Enumeration and BITS decoding.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::octets::{has_hex_prefix, parse_hex_bytes};
use crate::error::{MibError, Result};

/// Value (or bit position) to label, as declared in a syntax literal.
pub type EnumMapping = BTreeMap<i64, String>;

static ENUM_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z][A-Za-z0-9_-]*)\s*\(\s*(-?\d+)\s*\)").expect("static regex")
});

/// Parse the `{ label(value), ... }` literal of a syntax declaration.
///
/// A syntax without braces has no mapping and yields an empty map. Braces
/// whose content has no `label(value)` items are rejected.
pub fn parse_enum_mapping(syntax: &str) -> Result<EnumMapping> {
    let Some(open) = syntax.find('{') else {
        return Ok(EnumMapping::new());
    };
    let close = syntax
        .rfind('}')
        .filter(|close| *close > open)
        .ok_or_else(|| MibError::invalid_input(format!("unterminated enumeration in '{syntax}'")))?;

    let body = &syntax[open + 1..close];
    let mut mapping = EnumMapping::new();
    for caps in ENUM_ITEM.captures_iter(body) {
        if let Ok(value) = caps[2].parse::<i64>() {
            mapping.insert(value, caps[1].to_string());
        }
    }

    if mapping.is_empty() {
        return Err(MibError::invalid_input(format!(
            "unsupported enumeration syntax '{syntax}'"
        )));
    }
    Ok(mapping)
}

/// Whether a syntax declares BITS, judged only by the text before its
/// enumeration literal so labels such as `bitsPerSecond(3)` do not count.
#[must_use]
pub fn is_bits_syntax(syntax: &str) -> bool {
    let head = syntax.split('{').next().unwrap_or_default();
    head.to_ascii_lowercase().contains("bits")
}

/// Render the set bits of a `0x`-prefixed octet string as `label, label`.
///
/// Bit 0 is the most significant bit of the first octet. Plain decimal input
/// is declined, as is a payload with no labelled bit set.
#[must_use]
pub fn format_bits(raw: &str, mapping: &EnumMapping) -> Option<String> {
    if !has_hex_prefix(raw) {
        return None;
    }
    let bytes = parse_hex_bytes(raw)?;

    let labels: Vec<&str> = mapping
        .iter()
        .filter_map(|(&index, label)| {
            let index = usize::try_from(index).ok()?;
            let byte = *bytes.get(index / 8)?;
            let mask = 0x80u8 >> (index % 8);
            (byte & mask != 0).then_some(label.as_str())
        })
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

/// Render an integer value with its enumeration label, as `up (1)`.
///
/// A label that already equals the raw text is returned alone.
#[must_use]
pub fn format_enum(raw: &str, mapping: &EnumMapping) -> Option<String> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        let label = mapping.get(&value)?;
        return Some(if label.eq_ignore_ascii_case(trimmed) {
            label.clone()
        } else {
            format!("{label} ({trimmed})")
        });
    }

    mapping
        .values()
        .find(|label| label.eq_ignore_ascii_case(trimmed))
        .cloned()
}
