//! MAC and IP address rendering.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::octets::parse_hex_bytes;

fn colon_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Render a 6-byte hardware address as `00:1A:2B:3C:4D:5E`.
///
/// Accepts colon-separated groups (`0:1a:2b:3c:4d:5e`), a hex payload with or
/// without `0x` and separators, or a raw 6-character string.
#[must_use]
pub fn format_mac_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    let groups: Vec<&str> = trimmed.split(':').collect();
    if groups.len() == 6
        && groups
            .iter()
            .all(|g| (1..=2).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        let bytes: Option<Vec<u8>> = groups
            .iter()
            .map(|g| u8::from_str_radix(g, 16).ok())
            .collect();
        return bytes.map(|b| colon_hex(&b));
    }

    if let Some(bytes) = parse_hex_bytes(trimmed).filter(|b| b.len() == 6) {
        return Some(colon_hex(&bytes));
    }

    // Some agents hand back the six octets as an unescaped string.
    if raw.len() == 6 && raw.is_ascii() {
        return Some(colon_hex(raw.as_bytes()));
    }
    None
}

/// Render an IP address from a textual literal or a 4- or 16-byte hex payload.
#[must_use]
pub fn format_ip_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Ok(ip) = trimmed.parse::<IpAddr>() {
        return Some(ip.to_string());
    }

    let bytes = parse_hex_bytes(trimmed)?;
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(Ipv4Addr::from(octets).to_string())
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(Ipv6Addr::from(octets).to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_from_plain_hex() {
        assert_eq!(
            format_mac_address("001a2b3c4d5e").as_deref(),
            Some("00:1A:2B:3C:4D:5E")
        );
        assert_eq!(
            format_mac_address("0x001A2B3C4D5E").as_deref(),
            Some("00:1A:2B:3C:4D:5E")
        );
    }

    #[test]
    fn test_mac_from_separated_forms() {
        assert_eq!(
            format_mac_address("0:1a:2b:3c:4d:5e").as_deref(),
            Some("00:1A:2B:3C:4D:5E")
        );
        assert_eq!(
            format_mac_address("00-1A-2B-3C-4D-5E").as_deref(),
            Some("00:1A:2B:3C:4D:5E")
        );
    }

    #[test]
    fn test_mac_from_raw_octets() {
        assert_eq!(
            format_mac_address("sw-01!").as_deref(),
            Some("73:77:2D:30:31:21")
        );
        // Six hex digits are only three octets, so the text itself is used.
        assert_eq!(
            format_mac_address("ABCDEF").as_deref(),
            Some("41:42:43:44:45:46")
        );
    }

    #[test]
    fn test_mac_rejects_wrong_length() {
        assert_eq!(format_mac_address("0x001A2B"), None);
        assert_eq!(format_mac_address(""), None);
    }

    #[test]
    fn test_ip_addresses() {
        assert_eq!(format_ip_address("10.0.0.1").as_deref(), Some("10.0.0.1"));
        assert_eq!(format_ip_address("0x0A000001").as_deref(), Some("10.0.0.1"));
        assert_eq!(
            format_ip_address("0x20010db8000000000000000000000001").as_deref(),
            Some("2001:db8::1")
        );
        assert_eq!(format_ip_address("0x0A00"), None);
        assert_eq!(format_ip_address("gateway"), None);
    }
}
