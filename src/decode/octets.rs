//! Hex payload parsing for octet-string values.
//!
//! SNMP clients render non-printable octet strings as hex, either
//! `0x`-prefixed (`0x001A2B`) or as separated byte pairs (`00:1a:2b`,
//! `00 1A 2B`).

fn strip_prefix(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ':' | '-' | ' ')
}

/// Whether `raw` starts with a `0x` / `0X` prefix.
#[must_use]
pub fn has_hex_prefix(raw: &str) -> bool {
    strip_prefix(raw).1
}

/// Decode a hex payload, with or without a `0x` prefix and with `:`, `-`
/// or space separators removed.
///
/// Returns `None` for empty input, odd digit counts, or non-hex characters.
#[must_use]
pub fn parse_hex_bytes(raw: &str) -> Option<Vec<u8>> {
    let (body, _) = strip_prefix(raw);
    let digits: String = body.chars().filter(|c| !is_separator(*c)).collect();
    if digits.is_empty() {
        return None;
    }
    hex::decode(digits).ok()
}

/// Whether a text value looks like a hex rendering of bytes rather than text.
///
/// True for a `0x` prefix followed by hex digits, or for two or more
/// two-digit hex groups separated by `:`, `-` or spaces.
#[must_use]
pub fn is_hex_like(raw: &str) -> bool {
    let (body, prefixed) = strip_prefix(raw);
    if prefixed {
        return parse_hex_bytes(body).is_some();
    }

    let groups: Vec<&str> = body.split(is_separator).collect();
    groups.len() >= 2
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
}
