//! SNMP table reconstruction.
//!
//! A walk over a table returns a flat list of `columnOID.index` results.
//! [`resolve_table_schema`] recovers the table, row and column nodes from
//! whichever of the three the caller holds, and [`build_table`] regroups the
//! results into rows keyed by index.

mod columns;
mod rows;
mod schema;

pub use columns::{humanize_identifier, ColumnDescriptor, ColumnKind};
pub use rows::{build_table, TableData, TableRow, INSTANCE_FIELD, RAW_SUFFIX};
pub use schema::{resolve_table_schema, resolve_table_schema_for_oid, TableSchema};
