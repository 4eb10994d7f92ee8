// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Online/offline state as reported by the backend's ping loop.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// The canonical device type, keyed by ip.
///
/// A cached copy of backend truth: refreshed periodically, never the
/// source of record. `name` and `location` are `None` when the backend
/// reports its "not set" sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ip: String,
    pub name: Option<String>,
    /// References an `Area::name`, or `None` for unassigned devices.
    pub location: Option<String>,
    pub status: DeviceStatus,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Device {
    /// Display name: the configured name, falling back to the ip.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ip)
    }
}
