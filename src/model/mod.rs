//! Data model for MIB metadata.
//!
//! Nodes and modules come from the external MIB parser, bookmarks from user
//! actions, and [`SnmpResult`] values from the external protocol client.
//! Records are flat; [`build_tree`] materializes parent/child views on demand:
//!
//! ```ignore
//! let nodes = store.get_children("1.3.6.1.2.1.2.2")?;
//! let forest = build_tree(nodes);
//! ```

mod bookmark;
mod node;
mod oid;
mod snmp;
mod tree;

pub use bookmark::*;
pub use node::*;
pub use oid::*;
pub use snmp::*;
pub use tree::*;
