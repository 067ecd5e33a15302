//! OID string helpers and the natural OID comparator.
//!
//! OIDs travel through the crate as dotted-decimal strings because that is
//! what both the MIB parser and the SNMP client hand us. The helpers here
//! normalize them and order them segment by segment.

use std::cmp::Ordering;

/// Normalize an OID string to canonical form.
///
/// Strips surrounding whitespace and any leading or trailing dots, so
/// `" .1.3.6.1. "` becomes `"1.3.6.1"`.
#[must_use]
pub fn normalize_oid(oid: &str) -> String {
    oid.trim().trim_matches('.').trim().to_string()
}

/// Split an OID into its non-empty dotted segments.
#[must_use]
pub fn oid_segments(oid: &str) -> Vec<&str> {
    oid.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of segments in an OID.
#[must_use]
pub fn segment_count(oid: &str) -> usize {
    oid_segments(oid).len()
}

/// Check that an OID is non-empty and every segment is a non-negative integer.
#[must_use]
pub fn is_valid_oid(oid: &str) -> bool {
    let normalized = normalize_oid(oid);
    !normalized.is_empty()
        && normalized
            .split('.')
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()))
}

/// Strip a single trailing `.0` scalar instance marker, if present.
#[must_use]
pub fn strip_instance_suffix(oid: &str) -> Option<&str> {
    oid.strip_suffix(".0").filter(|rest| !rest.is_empty())
}

/// Parent OID by arithmetic (all segments but the last).
///
/// Only used for prefix trimming; the MIB hierarchy itself is followed through
/// `parent_oid` links.
#[must_use]
pub fn trim_last_segment(oid: &str) -> Option<&str> {
    oid.rfind('.').map(|idx| &oid[..idx]).filter(|s| !s.is_empty())
}

/// If `prefix` is `oid` itself or a dotted prefix of it, return the remaining
/// suffix (empty when equal).
#[must_use]
pub fn strip_oid_prefix<'a>(oid: &'a str, prefix: &str) -> Option<&'a str> {
    if oid == prefix {
        return Some("");
    }
    oid.strip_prefix(prefix)?.strip_prefix('.')
}

/// Compare two OIDs segment by segment, numerically where possible.
///
/// `"1.3.6.1.2.2.1.2"` sorts before `"1.3.6.1.2.2.1.10"`. When every shared
/// segment is equal the shorter OID sorts first. Segments that are not both
/// numeric fall back to string comparison.
#[must_use]
pub fn compare_oids(a: &str, b: &str) -> Ordering {
    let left = oid_segments(a);
    let right = oid_segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(ln), Ok(rn)) => ln.cmp(&rn),
            _ => l.cmp(r),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len())
}

/// Sort a slice of OID-like strings in natural order.
pub fn sort_oids<S: AsRef<str>>(oids: &mut [S]) {
    oids.sort_by(|a, b| compare_oids(a.as_ref(), b.as_ref()));
}
