//! Column presentation metadata.

use serde::Serialize;

use crate::model::Node;

/// Syntax fragments that mark a column as numeric.
const NUMERIC_HINTS: &[&str] = &[
    "int", "counter", "gauge", "timeticks", "unsigned", "bits", "enum",
];

/// Broad value kind of a column, for alignment and sorting in views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    String,
}

impl ColumnKind {
    /// Infer the kind from a syntax declaration.
    #[must_use]
    pub fn from_syntax(syntax: &str) -> Self {
        let lower = syntax.to_ascii_lowercase();
        if NUMERIC_HINTS.iter().any(|hint| lower.contains(hint)) {
            Self::Number
        } else {
            Self::String
        }
    }
}

/// A table column as presented to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub oid: String,
    pub label: String,
    pub kind: ColumnKind,
    pub syntax: String,
    pub access: String,
}

impl From<&Node> for ColumnDescriptor {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            oid: node.oid.clone(),
            label: humanize_identifier(&node.name),
            kind: ColumnKind::from_syntax(&node.syntax),
            syntax: node.syntax.clone(),
            access: node.access.clone(),
        }
    }
}

/// Turn a MIB identifier into words: `ifOperStatus` becomes
/// `If Oper Status`, `ifHCInOctets` becomes `If HC In Octets`.
#[must_use]
pub fn humanize_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    #[test]
    fn test_humanize_identifier() {
        assert_eq!(humanize_identifier("ifOperStatus"), "If Oper Status");
        assert_eq!(humanize_identifier("ifHCInOctets"), "If HC In Octets");
        assert_eq!(humanize_identifier("vlan_port-id"), "Vlan Port Id");
        assert_eq!(humanize_identifier("dot1dBasePort"), "Dot1d Base Port");
        assert_eq!(humanize_identifier(""), "");
    }

    #[test]
    fn test_column_kind() {
        assert_eq!(ColumnKind::from_syntax("Counter64"), ColumnKind::Number);
        assert_eq!(ColumnKind::from_syntax("INTEGER { up(1) }"), ColumnKind::Number);
        assert_eq!(ColumnKind::from_syntax("TimeTicks"), ColumnKind::Number);
        assert_eq!(ColumnKind::from_syntax("DisplayString"), ColumnKind::String);
        assert_eq!(ColumnKind::from_syntax("PhysAddress"), ColumnKind::String);
    }

    #[test]
    fn test_descriptor_from_node() {
        let node = Node::new("1.3.6.1.2.1.2.2.1.8", "ifOperStatus", NodeKind::Column)
            .with_syntax("INTEGER { up(1), down(2) }");
        let column = ColumnDescriptor::from(&node);
        assert_eq!(column.label, "If Oper Status");
        assert_eq!(column.kind, ColumnKind::Number);
    }
}
