//! Integration tests for table reconstruction from walk results.

use mib_tools::cli::{import_module, load_table, render_table_text, ImportDocument};
use mib_tools::store::{MemoryNodes, MibStore, NodeSource};
use mib_tools::table::{
    build_table, resolve_table_schema, resolve_table_schema_for_oid, ColumnKind, INSTANCE_FIELD,
};
use mib_tools::{MibError, Node, NodeKind, SnmpResult};
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn loaded_store() -> MibStore {
    let store = MibStore::open_in_memory().unwrap();
    import_module(
        &store,
        ImportDocument::from_path(&fixture_path("if-mib.json")).unwrap(),
    )
    .unwrap();
    store
}

#[test]
fn test_two_column_rows_sorted_by_index() {
    let nodes: MemoryNodes = [
        Node::new("1.3.6.1.2.1.2.2", "ifTable", NodeKind::Table),
        Node::new("1.3.6.1.2.1.2.2.1", "ifEntry", NodeKind::Row).with_parent("1.3.6.1.2.1.2.2"),
        Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column)
            .with_parent("1.3.6.1.2.1.2.2.1")
            .with_syntax("DisplayString"),
        Node::new("1.3.6.1.2.1.2.2.1.10", "ifInOctets", NodeKind::Column)
            .with_parent("1.3.6.1.2.1.2.2.1")
            .with_syntax("Counter32"),
    ]
    .into_iter()
    .collect();
    let table = nodes.node_exact("1.3.6.1.2.1.2.2").unwrap().unwrap();
    let schema = resolve_table_schema(&nodes, &table).unwrap();

    let results = [
        SnmpResult::new("1.3.6.1.2.1.2.2.1.10.2", "77", "Counter32"),
        SnmpResult::new("1.3.6.1.2.1.2.2.1.2.1", "lo", "OctetString"),
        SnmpResult::new("1.3.6.1.2.1.2.2.1.2.2", "eth0", "OctetString"),
        SnmpResult::new("1.3.6.1.2.1.2.2.1.10.1", "12", "Counter32"),
    ];
    let data = build_table(&schema, &results);

    assert_eq!(data.rows.len(), 2);
    assert_eq!(data.indices().collect::<Vec<_>>(), vec!["1", "2"]);
    for row in &data.rows {
        assert!(row.contains_key("ifDescr"));
        assert!(row.contains_key("ifInOctets"));
    }
    assert_eq!(data.rows[1][INSTANCE_FIELD], "2");
    assert_eq!(data.rows[1]["ifDescr"], "eth0");
    assert_eq!(data.rows[1]["ifInOctets__raw"], "77");
    assert_eq!(data.skipped_results, 0);
}

#[test]
fn test_walk_fixture_decodes_cells() {
    let store = loaded_store();
    let data = load_table(&store, "1.3.6.1.2.1.2.2", &fixture_path("if-walk.json")).unwrap();

    assert_eq!(data.table, "ifTable");
    assert_eq!(data.indices().collect::<Vec<_>>(), vec!["2", "10"]);
    assert_eq!(data.skipped_results, 1);

    let eth = &data.rows[0];
    assert_eq!(eth["ifPhysAddress"], "00:11:22:33:44:AA");
    assert_eq!(eth["ifOperStatus"], "up (1)");
    assert_eq!(eth["ifOperStatus__raw"], "1");

    let gig = &data.rows[1];
    assert_eq!(gig["ifDescr"], "GigabitEthernet0/1");
    assert_eq!(gig["ifOperStatus"], "down (2)");
    assert_eq!(gig["ifPhysAddress"], "");
}

#[test]
fn test_column_descriptors() {
    let store = loaded_store();
    let schema = resolve_table_schema_for_oid(&store, "1.3.6.1.2.1.2.2.1.8").unwrap();
    assert_eq!(schema.table.name, "ifTable");
    assert_eq!(schema.row.name, "ifEntry");

    let data = build_table(&schema, &[]);
    let labels: Vec<_> = data.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "If Index",
            "If Descr",
            "If Phys Address",
            "If Oper Status",
            "If In Octets"
        ]
    );
    let kinds: Vec<_> = data.columns.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Number,
            ColumnKind::String,
            ColumnKind::String,
            ColumnKind::Number,
            ColumnKind::Number
        ]
    );
    assert!(data.rows.is_empty());
}

#[test]
fn test_text_rendering_of_fixture() {
    let store = loaded_store();
    let data = load_table(&store, "1.3.6.1.2.1.2.2.1", &fixture_path("if-walk.json")).unwrap();
    let text = render_table_text(&data);
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Index\tIf Index\tIf Descr\tIf Phys Address\tIf Oper Status\tIf In Octets"
    );
    assert_eq!(lines[1], "2\t\teth0\t00:11:22:33:44:AA\tup (1)\t123456");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_schema_errors() {
    let store = loaded_store();

    // A scalar is not tabular
    assert!(matches!(
        resolve_table_schema_for_oid(&store, "1.3.6.1.2.1.2.1.0"),
        Err(MibError::InvalidInput(_))
    ));
    assert!(matches!(
        resolve_table_schema_for_oid(&store, "1.3.6.1.2.1.99"),
        Err(MibError::NotFound { .. })
    ));

    let nodes: MemoryNodes = [
        Node::new("1.3.6.1.4.1.99.1", "emptyTable", NodeKind::Table),
        Node::new("1.3.6.1.4.1.99.2", "lonelyRow", NodeKind::Row).with_parent("1.3.6.1.4.1.99.1"),
        Node::new("1.3.6.1.4.1.99.3", "orphanColumn", NodeKind::Column)
            .with_parent("1.3.6.1.4.1.99.9"),
    ]
    .into_iter()
    .collect();

    let lonely = Node::new("1.3.6.1.4.1.99.2", "lonelyRow", NodeKind::Row)
        .with_parent("1.3.6.1.4.1.99.1");
    assert!(matches!(
        resolve_table_schema(&nodes, &lonely),
        Err(MibError::NotFound { .. })
    ));

    let orphan = Node::new("1.3.6.1.4.1.99.3", "orphanColumn", NodeKind::Column)
        .with_parent("1.3.6.1.4.1.99.9");
    assert!(matches!(
        resolve_table_schema(&nodes, &orphan),
        Err(MibError::NotFound { .. })
    ));
}

#[test]
fn test_composite_indices_sort_component_wise() {
    let nodes: MemoryNodes = [
        Node::new("1.3.6.1.4.1.99.1", "metricTable", NodeKind::Table),
        Node::new("1.3.6.1.4.1.99.1.1", "metricEntry", NodeKind::Row)
            .with_parent("1.3.6.1.4.1.99.1"),
        Node::new("1.3.6.1.4.1.99.1.1.3", "metricValue", NodeKind::Column)
            .with_parent("1.3.6.1.4.1.99.1.1")
            .with_syntax("Gauge32"),
    ]
    .into_iter()
    .collect();
    let schema = resolve_table_schema_for_oid(&nodes, "1.3.6.1.4.1.99.1.1.3").unwrap();

    let results: Vec<_> = ["10.42", "2.7", "10.5", "2.10"]
        .iter()
        .map(|idx| SnmpResult::new(format!("1.3.6.1.4.1.99.1.1.3.{idx}"), "1", "Gauge32"))
        .collect();
    let data = build_table(&schema, &results);
    assert_eq!(
        data.indices().collect::<Vec<_>>(),
        vec!["2.7", "2.10", "10.5", "10.42"]
    );
}
