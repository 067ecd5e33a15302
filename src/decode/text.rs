//! DisplayString decoding with encoding detection.
//!
//! Agents return text octet strings in whatever encoding the device uses.
//! When the client could only render the value as hex, the bytes are run
//! through [`TEXT_STRATEGIES`] in order and the first decoding that survives
//! [`sanitize`] wins.

use super::octets::{is_hex_like, parse_hex_bytes};

/// Share of runes that must be graphic for a decoded string to be accepted.
const MIN_GRAPHIC_RATIO: f64 = 0.85;

/// Share of bytes that must be printable for the Latin-1 fallback.
const MIN_LATIN1_PRINTABLE_RATIO: f64 = 0.70;

/// Share of byte pairs with a zero half for the UTF-16 heuristic.
const MIN_UTF16_ZERO_RATIO: f64 = 0.40;

/// A named byte decoder in the detection cascade.
#[derive(Debug, Clone, Copy)]
pub struct TextStrategy {
    pub name: &'static str,
    pub decode: fn(&[u8]) -> Option<String>,
}

/// Detection order: strict encodings first, the permissive Latin-1 last.
pub const TEXT_STRATEGIES: &[TextStrategy] = &[
    TextStrategy {
        name: "ascii",
        decode: decode_ascii,
    },
    TextStrategy {
        name: "utf-8",
        decode: decode_utf8,
    },
    TextStrategy {
        name: "utf-16",
        decode: decode_utf16,
    },
    TextStrategy {
        name: "latin-1",
        decode: decode_latin1,
    },
];

/// Decode a DisplayString value.
///
/// Hex-like values are decoded as bytes through [`TEXT_STRATEGIES`]; anything
/// else is taken as text. Returns `None` when nothing sanitizes to a
/// non-empty string.
#[must_use]
pub fn decode_display_string(raw: &str) -> Option<String> {
    if !is_hex_like(raw) {
        return sanitize(raw);
    }
    let bytes = parse_hex_bytes(raw)?;
    decode_bytes(&bytes)
}

/// Run the detection cascade over raw bytes.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> Option<String> {
    TEXT_STRATEGIES.iter().find_map(|strategy| {
        let decoded = (strategy.decode)(bytes)?;
        let clean = sanitize(&decoded)?;
        tracing::trace!(strategy = strategy.name, "decoded display string");
        Some(clean)
    })
}

/// Trim NULs and whitespace, then require mostly graphic characters.
#[must_use]
pub fn sanitize(text: &str) -> Option<String> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }

    let total = trimmed.chars().count();
    let graphic = trimmed
        .chars()
        .filter(|c| !c.is_control() && *c != char::REPLACEMENT_CHARACTER)
        .count();
    if (graphic as f64) / (total as f64) < MIN_GRAPHIC_RATIO {
        return None;
    }
    Some(trimmed.to_string())
}

fn is_printable_ascii(b: u8) -> bool {
    (0x20..=0x7e).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r')
}

fn decode_ascii(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let body = &bytes[..end];
    if body.is_empty() || !body.iter().copied().all(is_printable_ascii) {
        return None;
    }
    Some(body.iter().map(|&b| char::from(b)).collect())
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

fn detect_utf16(bytes: &[u8]) -> Option<(Endian, &[u8])> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    match bytes {
        [0xff, 0xfe, rest @ ..] => return Some((Endian::Little, rest)),
        [0xfe, 0xff, rest @ ..] => return Some((Endian::Big, rest)),
        _ => {}
    }

    let pairs = bytes.len() / 2;
    let (mut high_zero, mut low_zero) = (0usize, 0usize);
    for pair in bytes.chunks_exact(2) {
        if pair[0] == 0 && pair[1] != 0 {
            low_zero += 1;
        } else if pair[1] == 0 && pair[0] != 0 {
            high_zero += 1;
        }
    }

    let threshold = pairs as f64 * MIN_UTF16_ZERO_RATIO;
    if high_zero as f64 >= threshold && high_zero > low_zero {
        Some((Endian::Little, bytes))
    } else if low_zero as f64 >= threshold && low_zero > high_zero {
        Some((Endian::Big, bytes))
    } else {
        None
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (endian, body) = detect_utf16(bytes)?;
    let units = body.chunks_exact(2).map(|pair| match endian {
        Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
        Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
    });
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

fn decode_latin1(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let printable = bytes
        .iter()
        .filter(|&&b| is_printable_ascii(b) || b >= 0xa0)
        .count();
    if (printable as f64) / (bytes.len() as f64) < MIN_LATIN1_PRINTABLE_RATIO {
        return None;
    }
    Some(bytes.iter().map(|&b| char::from(b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = TEXT_STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["ascii", "utf-8", "utf-16", "latin-1"]);
    }

    #[test]
    fn test_ascii_with_nul_padding() {
        assert_eq!(decode_ascii(b"eth0\0\0").as_deref(), Some("eth0"));
        assert_eq!(decode_ascii(b"a\0b"), None);
    }

    #[test]
    fn test_utf16_le_without_bom() {
        let bytes = utf16le("Software");
        assert_eq!(decode_bytes(&bytes).as_deref(), Some("Software"));
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xfe, 0xff];
        bytes.extend("Ok".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(decode_utf16(&bytes).as_deref(), Some("Ok"));
    }

    #[test]
    fn test_utf8_multibyte() {
        let encoded = hex::encode("Zürich".as_bytes());
        assert_eq!(
            decode_display_string(&format!("0x{encoded}")).as_deref(),
            Some("Zürich")
        );
    }

    #[test]
    fn test_latin1_fallback() {
        // "Caf\xe9 M\xfcnchen" is not valid UTF-8.
        let bytes = b"Caf\xe9 M\xfcnchen";
        assert_eq!(decode_bytes(bytes).as_deref(), Some("Café München"));
    }

    #[test]
    fn test_binary_payload_rejected() {
        assert_eq!(decode_display_string("0x0102030405"), None);
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(
            decode_display_string("  core-switch-01 ").as_deref(),
            Some("core-switch-01")
        );
        assert_eq!(decode_display_string("   "), None);
    }
}
