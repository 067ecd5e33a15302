//! TimeTicks and DateAndTime rendering.

use super::octets::parse_hex_bytes;

const TICKS_PER_SECOND: u64 = 100;
const TICKS_PER_MINUTE: u64 = 60 * TICKS_PER_SECOND;
const TICKS_PER_HOUR: u64 = 60 * TICKS_PER_MINUTE;
const TICKS_PER_DAY: u64 = 24 * TICKS_PER_HOUR;

/// Render hundredths of a second as `2d 3h 15m 42.50s`.
///
/// Leading units are omitted until the first non-zero one; seconds are always
/// shown. Negative values are treated by magnitude. Zero renders as `0s`.
#[must_use]
pub fn format_time_ticks(raw: &str) -> Option<String> {
    let ticks = raw.trim().parse::<i64>().ok()?.unsigned_abs();
    if ticks == 0 {
        return Some("0s".to_string());
    }

    let days = ticks / TICKS_PER_DAY;
    let hours = (ticks % TICKS_PER_DAY) / TICKS_PER_HOUR;
    let minutes = (ticks % TICKS_PER_HOUR) / TICKS_PER_MINUTE;
    let seconds = (ticks % TICKS_PER_MINUTE) / TICKS_PER_SECOND;
    let hundredths = ticks % TICKS_PER_SECOND;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}.{hundredths:02}s"));
    Some(parts.join(" "))
}

/// Render an 8- or 11-byte DateAndTime octet string.
///
/// Layout: year (2 bytes, big-endian), month, day, hour, minute, second,
/// deci-seconds, then optionally the UTC direction (`+`/`-`) and offset
/// hours and minutes. The 8-byte form renders with a `Z` zone.
#[must_use]
pub fn format_date_and_time(raw: &str) -> Option<String> {
    let bytes = parse_hex_bytes(raw)?;
    if bytes.len() != 8 && bytes.len() != 11 {
        return None;
    }

    let year = u16::from_be_bytes([bytes[0], bytes[1]]);
    let (month, day, hour, minute, second, deci) =
        (bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]);
    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || minute > 59
        || second > 60
        || deci > 9
    {
        return None;
    }

    let stamp =
        format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{deci:02}");
    if bytes.len() == 8 {
        return Some(format!("{stamp} Z"));
    }

    let sign = match bytes[8] {
        b'+' => '+',
        b'-' => '-',
        _ => return None,
    };
    let (offset_hours, offset_minutes) = (bytes[9], bytes[10]);
    if offset_hours > 14 || offset_minutes > 59 {
        return None;
    }
    Some(format!(
        "{stamp} {sign}{offset_hours:02}:{offset_minutes:02}"
    ))
}
