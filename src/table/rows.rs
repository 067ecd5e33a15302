//! Row assembly from flat walk results.

use indexmap::IndexMap;
use serde::Serialize;

use super::columns::ColumnDescriptor;
use super::schema::TableSchema;
use crate::decode::format_value;
use crate::model::{compare_oids, normalize_oid, strip_oid_prefix, Node, SnmpResult};

/// Field holding a row's index suffix.
pub const INSTANCE_FIELD: &str = "__instance";

/// Suffix of the field holding a column's undecoded value.
pub const RAW_SUFFIX: &str = "__raw";

/// One table row: `__instance`, then `<column>` and `<column>__raw` pairs in
/// the order the cells arrived.
pub type TableRow = IndexMap<String, String>;

/// A reconstructed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Sorted by index, component by component
    pub rows: Vec<TableRow>,
    /// Results that matched no column
    pub skipped_results: usize,
}

impl TableData {
    /// Row indices in output order.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(INSTANCE_FIELD).map(String::as_str))
    }
}

/// Match a result OID to the column it belongs to, returning the column and
/// the row index. Longer column OIDs win when several are prefixes.
fn match_column<'a>(columns: &'a [Node], oid: &str) -> Option<(&'a Node, String)> {
    columns
        .iter()
        .filter_map(|column| {
            strip_oid_prefix(oid, &column.oid).map(|index| (column, index.to_string()))
        })
        .max_by_key(|(column, _)| column.oid.len())
        .map(|(column, index)| {
            let index = if index.is_empty() {
                "0".to_string()
            } else {
                index
            };
            (column, index)
        })
}

/// Assemble walk results into rows keyed by table index.
///
/// Each cell holds the decoded display value (the raw value when decoding
/// yields nothing) next to a `<column>__raw` copy of the raw value. Results
/// outside every column are counted in `skipped_results` and otherwise
/// ignored.
#[must_use]
pub fn build_table(schema: &TableSchema, results: &[SnmpResult]) -> TableData {
    let mut rows: IndexMap<String, TableRow> = IndexMap::new();
    let mut skipped = 0usize;

    for result in results {
        let oid = normalize_oid(&result.oid);
        let Some((column, index)) = match_column(&schema.columns, &oid) else {
            tracing::debug!(oid = %oid, table = %schema.table.name, "walk result matches no column");
            skipped += 1;
            continue;
        };

        let display = format_value(&result.value, &result.value_type, &column.syntax).text;
        let display = if display.is_empty() {
            result.value.clone()
        } else {
            display
        };

        let row = rows.entry(index.clone()).or_insert_with(|| {
            let mut row = TableRow::new();
            row.insert(INSTANCE_FIELD.to_string(), index);
            row
        });
        row.insert(column.name.clone(), display);
        row.insert(format!("{}{RAW_SUFFIX}", column.name), result.value.clone());
    }

    if skipped > 0 {
        tracing::debug!(
            table = %schema.table.name,
            skipped,
            "skipped walk results outside the table"
        );
    }

    rows.sort_by(|a, _, b, _| compare_oids(a, b));

    TableData {
        table: schema.table.name.clone(),
        columns: schema.columns.iter().map(ColumnDescriptor::from).collect(),
        rows: rows.into_values().collect(),
        skipped_results: skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn schema() -> TableSchema {
        TableSchema {
            table: Node::new("1.3.6.1.2.1.2.2", "ifTable", NodeKind::Table),
            row: Node::new("1.3.6.1.2.1.2.2.1", "ifEntry", NodeKind::Row),
            columns: vec![
                Node::new("1.3.6.1.2.1.2.2.1.1", "ifIndex", NodeKind::Column)
                    .with_syntax("InterfaceIndex"),
                Node::new("1.3.6.1.2.1.2.2.1.8", "ifOperStatus", NodeKind::Column)
                    .with_syntax("INTEGER { up(1), down(2) }"),
                Node::new("1.3.6.1.2.1.2.2.1.10", "ifInOctets", NodeKind::Column)
                    .with_syntax("Counter32"),
            ],
        }
    }

    #[test]
    fn test_longest_column_prefix_wins() {
        let columns = schema().columns;
        let (column, index) = match_column(&columns, "1.3.6.1.2.1.2.2.1.10.3").unwrap();
        assert_eq!(column.name, "ifInOctets");
        assert_eq!(index, "3");

        let (column, index) = match_column(&columns, "1.3.6.1.2.1.2.2.1.1").unwrap();
        assert_eq!(column.name, "ifIndex");
        assert_eq!(index, "0");
    }

    #[test]
    fn test_cells_are_decoded_with_raw_copy() {
        let results = vec![SnmpResult::new("1.3.6.1.2.1.2.2.1.8.1", "2", "Integer")];
        let table = build_table(&schema(), &results);
        let row = &table.rows[0];
        assert_eq!(row["ifOperStatus"], "down (2)");
        assert_eq!(row["ifOperStatus__raw"], "2");
        let keys: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["__instance", "ifOperStatus", "ifOperStatus__raw"]);
    }

    #[test]
    fn test_composite_indices_sort_naturally() {
        let results = vec![
            SnmpResult::new("1.3.6.1.2.1.2.2.1.1.10.2", "a", "Integer"),
            SnmpResult::new("1.3.6.1.2.1.2.2.1.1.9.30", "b", "Integer"),
            SnmpResult::new("1.3.6.1.2.1.2.2.1.1.10.1", "c", "Integer"),
        ];
        let table = build_table(&schema(), &results);
        let indices: Vec<_> = table.indices().collect();
        assert_eq!(indices, vec!["9.30", "10.1", "10.2"]);
    }

    #[test]
    fn test_unmatched_results_are_counted() {
        let results = vec![
            SnmpResult::new("1.3.6.1.2.1.2.2.1.10.1", "100", "Counter32"),
            SnmpResult::new("1.3.6.1.2.1.31.1.1.1.1.1", "eth0", "OctetString"),
        ];
        let table = build_table(&schema(), &results);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.skipped_results, 1);
    }
}
