//! Syntax-directed value decoding.
//!
//! [`format_value`] takes a raw protocol value, its type tag and the MIB
//! syntax of the node it belongs to, and renders it for display. Each
//! [`SyntaxFamily`] is tried in [`SyntaxFamily::PRIORITY`] order; the first
//! family that applies and decodes successfully wins. When none does, the raw
//! value is returned unchanged with `formatted == false`.
//!
//! ```
//! use mib_tools::decode::format_value;
//!
//! let v = format_value("8640000", "TimeTicks", "");
//! assert_eq!(v.text, "1d 0h 0m 0.00s");
//!
//! let v = format_value("1", "Integer", "INTEGER { up(1), down(2) }");
//! assert_eq!(v.text, "up (1)");
//! ```

mod address;
mod enums;
mod octets;
mod text;
mod time;

pub use address::{format_ip_address, format_mac_address};
pub use enums::{format_bits, format_enum, is_bits_syntax, parse_enum_mapping, EnumMapping};
pub use octets::{is_hex_like, parse_hex_bytes};
pub use text::{decode_bytes, decode_display_string, sanitize, TextStrategy, TEXT_STRATEGIES};
pub use time::{format_date_and_time, format_time_ticks};

use serde::Serialize;

/// A display rendering of a raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedValue {
    pub text: String,
    /// Whether a syntax-specific decoder produced `text`
    pub formatted: bool,
}

impl FormattedValue {
    fn formatted(text: String) -> Self {
        Self {
            text,
            formatted: true,
        }
    }

    fn raw(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            formatted: false,
        }
    }
}

impl std::fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Families of MIB syntaxes with a dedicated decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxFamily {
    TimeTicks,
    DateAndTime,
    MacAddress,
    IpAddress,
    Bits,
    Enumeration,
    DisplayString,
}

impl SyntaxFamily {
    /// Order in which families are tried.
    pub const PRIORITY: [Self; 7] = [
        Self::TimeTicks,
        Self::DateAndTime,
        Self::MacAddress,
        Self::IpAddress,
        Self::Bits,
        Self::Enumeration,
        Self::DisplayString,
    ];

    /// Whether this family applies to a value with the given type tag and
    /// syntax.
    #[must_use]
    pub fn applies(self, value_type: &str, syntax: &str) -> bool {
        let syntax_lc = syntax.to_ascii_lowercase();
        let type_lc = value_type.to_ascii_lowercase();
        match self {
            Self::TimeTicks => {
                ["timeticks", "timestamp", "timeinterval"]
                    .iter()
                    .any(|hint| syntax_lc.contains(hint))
                    || type_lc.contains("timeticks")
            }
            Self::DateAndTime => syntax_lc.contains("dateandtime"),
            Self::MacAddress => {
                syntax_lc.contains("macaddress") || syntax_lc.contains("physaddress")
            }
            Self::IpAddress => {
                let by_syntax = (syntax_lc.contains("inetaddress")
                    || syntax_lc.contains("ipaddress"))
                    && !syntax_lc.contains("inetaddresstype");
                by_syntax || type_lc.contains("ipaddress")
            }
            Self::Bits => syntax.contains('{') && is_bits_syntax(syntax),
            Self::Enumeration => syntax.contains('{') && !is_bits_syntax(syntax),
            Self::DisplayString => {
                syntax_lc.contains("displaystring") || syntax_lc.contains("snmpadminstring")
            }
        }
    }

    /// Run this family's decoder. `None` means it declined.
    #[must_use]
    pub fn decode(self, raw: &str, syntax: &str) -> Option<String> {
        match self {
            Self::TimeTicks => format_time_ticks(raw),
            Self::DateAndTime => format_date_and_time(raw),
            Self::MacAddress => format_mac_address(raw),
            Self::IpAddress => format_ip_address(raw),
            Self::Bits => format_bits(raw, &parse_enum_mapping(syntax).ok()?),
            Self::Enumeration => format_enum(raw, &parse_enum_mapping(syntax).ok()?),
            Self::DisplayString => decode_display_string(raw),
        }
    }
}

/// Families applicable to a value, in priority order.
#[must_use]
pub fn applicable_families(value_type: &str, syntax: &str) -> Vec<SyntaxFamily> {
    SyntaxFamily::PRIORITY
        .into_iter()
        .filter(|family| family.applies(value_type, syntax))
        .collect()
}

/// Render a raw protocol value for display.
#[must_use]
pub fn format_value(raw: &str, value_type: &str, syntax: &str) -> FormattedValue {
    for family in applicable_families(value_type, syntax) {
        if let Some(text) = family.decode(raw, syntax) {
            return FormattedValue::formatted(text);
        }
        tracing::trace!(?family, "decoder declined value");
    }
    FormattedValue::raw(raw)
}
