//! Longest-prefix OID matching.
//!
//! Everything here is free of caching so it can be exercised directly
//! against a [`MemoryNodes`](crate::store::MemoryNodes) map.

use std::collections::HashSet;

use crate::error::Result;
use crate::model::{normalize_oid, oid_segments, segment_count, strip_oid_prefix, Node};
use crate::store::NodeSource;

/// One prefix/suffix split of a queried OID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub prefix: String,
    /// Remaining segments, dot-joined; empty for the full OID
    pub suffix: String,
}

impl Candidate {
    fn new(prefix: String, suffix: String) -> Self {
        Self { prefix, suffix }
    }
}

/// A loaded node covering a queried OID, plus the instance suffix beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
    pub node: Node,
    pub suffix: String,
}

impl PrefixMatch {
    /// The display label for this match.
    #[must_use]
    pub fn label(&self) -> String {
        format_label(&self.node.name, &self.suffix)
    }
}

/// Prefix/suffix splits of `oid`, longest prefix first.
///
/// The full OID comes first with an empty suffix. Each prefix appears in both
/// the dotted (`1.3.6`) and dot-prefixed (`.1.3.6`) spelling, since MIB
/// tooling disagrees on which one is canonical. Duplicates are removed.
#[must_use]
pub fn candidates(oid: &str) -> Vec<Candidate> {
    let normalized = normalize_oid(oid);
    let segments = oid_segments(&normalized);
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(segments.len() * 2 + 1);

    let mut push = |candidate: Candidate| {
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    };

    if !normalized.is_empty() {
        push(Candidate::new(normalized.clone(), String::new()));
    }
    for k in (1..=segments.len()).rev() {
        let prefix = segments[..k].join(".");
        let suffix = segments[k..].join(".");
        push(Candidate::new(format!(".{prefix}"), suffix.clone()));
        push(Candidate::new(prefix, suffix));
    }
    out
}

/// Format a resolved label.
///
/// An empty suffix or the scalar instance marker `"0"` gives the bare name;
/// anything else is appended in brackets, e.g. `ifDescr[10]` or
/// `metricValue[10.42]`.
#[must_use]
pub fn format_label(base: &str, suffix: &str) -> String {
    let suffix = suffix.trim_matches('.');
    if suffix.is_empty() || suffix == "0" {
        base.to_string()
    } else {
        format!("{base}[{suffix}]")
    }
}

/// Find the named node that best covers `oid`.
///
/// Tries each candidate prefix against the source, longest first, and takes
/// the first node with a non-empty name. When no prefix is loaded under a
/// name, falls back to the nearest named ancestor reachable through parent
/// links, with the suffix taken as the segments beyond the ancestor's length.
pub fn find_longest_prefix_match<S: NodeSource + ?Sized>(
    source: &S,
    oid: &str,
) -> Result<Option<PrefixMatch>> {
    let normalized = normalize_oid(oid);
    if normalized.is_empty() {
        return Ok(None);
    }

    let mut probed = HashSet::new();
    for candidate in candidates(&normalized) {
        let prefix = normalize_oid(&candidate.prefix);
        if !probed.insert(prefix.clone()) {
            continue;
        }
        tracing::trace!(prefix = %prefix, "probing resolution candidate");
        if let Some(node) = source.node_exact(&prefix)? {
            if !node.name.is_empty() {
                return Ok(Some(PrefixMatch {
                    node,
                    suffix: candidate.suffix,
                }));
            }
        }
    }

    nearest_named_ancestor(source, &normalized)
}

/// Fallback once no prefix matched: the nearest named node reachable through
/// parent links, with every segment beyond its depth as the suffix.
pub(crate) fn nearest_named_ancestor<S: NodeSource + ?Sized>(
    source: &S,
    normalized: &str,
) -> Result<Option<PrefixMatch>> {
    let ancestors = source.get_node_ancestors(normalized)?;
    let Some(node) = ancestors.into_iter().find(|n| !n.name.is_empty()) else {
        return Ok(None);
    };
    let suffix = oid_segments(normalized)
        .into_iter()
        .skip(segment_count(&node.oid))
        .collect::<Vec<_>>()
        .join(".");
    Ok(Some(PrefixMatch { node, suffix }))
}

/// Find the loaded node with the longest OID prefix of `oid`, named or not.
///
/// Trims one trailing segment at a time. Used to recover a node's syntax for
/// value decoding when no label is needed.
pub fn find_covering_node<S: NodeSource + ?Sized>(source: &S, oid: &str) -> Result<Option<Node>> {
    let normalized = normalize_oid(oid);
    let mut probe = Some(normalized.as_str()).filter(|s| !s.is_empty());
    while let Some(current) = probe {
        if let Some(node) = source.node_exact(current)? {
            return Ok(Some(node));
        }
        probe = crate::model::trim_last_segment(current);
    }
    Ok(None)
}

/// Suffix of `oid` beyond `node`, if `node` is a dotted prefix of it.
#[must_use]
pub fn instance_suffix(oid: &str, node: &Node) -> Option<String> {
    strip_oid_prefix(&normalize_oid(oid), &node.oid).map(str::to_string)
}
