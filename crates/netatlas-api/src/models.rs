// Wire types for the monitor backend.
//
// The backend is loosely typed: booleans arrive as the strings "true" /
// "false", timestamps as epoch-seconds strings, and unset optional fields
// as sentinel strings ("Location not set", "Name not set"). These types
// carry the payloads verbatim; normalization into strong domain types
// happens in `netatlas-core::convert`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry in the `GET /status` response map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatusEntry {
    /// "true" or "false" -- the backend serializes this as a string.
    pub online: String,

    /// Area name, or the sentinel "Location not set".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Display name, or the sentinel "Name not set".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Epoch seconds as a string, e.g. "1717430400".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

/// The full `GET /status` payload, keyed by device ip.
///
/// A `BTreeMap` on purpose: iteration order is ip-lexical, which makes
/// every downstream layout computation deterministic across refreshes.
pub type StatusResponse = BTreeMap<String, DeviceStatusEntry>;

/// `GET /logs` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
}

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}
