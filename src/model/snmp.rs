//! Results handed over by the external SNMP client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One varbind returned by a GET, GETNEXT, WALK, GETBULK or SET request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpResult {
    pub oid: String,
    /// Raw value as rendered by the protocol client
    pub value: String,
    /// Protocol type tag, e.g. `TimeTicks`, `OctetString`, `Integer`
    #[serde(rename = "type")]
    pub value_type: String,
    /// Per-varbind status, e.g. `noError`, `noSuchObject`
    pub status: String,
    /// Round-trip time in milliseconds
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SnmpResult {
    /// Create a result with just an OID, value and type tag.
    pub fn new(
        oid: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            oid: oid.into(),
            value: value.into(),
            value_type: value_type.into(),
            ..Self::default()
        }
    }
}
