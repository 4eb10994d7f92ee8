// ── API-to-domain type conversions ──
//
// Bridges the loosely typed monitor backend payloads into canonical
// `netatlas_core::model` domain types. The backend serializes booleans as
// strings, timestamps as epoch-second strings, and unset fields as
// sentinel text; everything is normalized here so the rest of the crate
// never sees a sentinel.

use chrono::{DateTime, Utc};

use netatlas_api::models::{DeviceStatusEntry, StatusResponse};

use crate::model::{Device, DeviceStatus};

/// Sentinel the backend returns for a device with no assigned area.
const LOCATION_NOT_SET: &str = "Location not set";

/// Sentinel the backend returns for a device with no configured name.
const NAME_NOT_SET: &str = "Name not set";

/// Convert the full `/status` map into domain devices.
///
/// The response is a `BTreeMap`, so the result is ordered by ip -- the
/// stable ordering every layout computation depends on.
pub fn devices_from_status(status: &StatusResponse) -> Vec<Device> {
    status
        .iter()
        .map(|(ip, entry)| device_from_entry(ip, entry))
        .collect()
}

/// Convert one status entry, dropping sentinel values.
pub fn device_from_entry(ip: &str, entry: &DeviceStatusEntry) -> Device {
    Device {
        ip: ip.to_owned(),
        name: non_sentinel(entry.name.as_deref(), NAME_NOT_SET),
        location: non_sentinel(entry.location.as_deref(), LOCATION_NOT_SET),
        status: if entry.online == "true" {
            DeviceStatus::Online
        } else {
            DeviceStatus::Offline
        },
        last_seen: parse_last_seen(entry.last_seen.as_deref()),
    }
}

/// Treat an absent, empty, or sentinel-valued field as `None`.
fn non_sentinel(raw: Option<&str>, sentinel: &str) -> Option<String> {
    raw.filter(|s| !s.is_empty() && *s != sentinel)
        .map(str::to_owned)
}

/// Parse an epoch-seconds string, silently dropping unparseable values.
fn parse_last_seen(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(online: &str, location: Option<&str>, name: Option<&str>) -> DeviceStatusEntry {
        DeviceStatusEntry {
            online: online.into(),
            location: location.map(str::to_owned),
            name: name.map(str::to_owned),
            last_seen: None,
        }
    }

    #[test]
    fn online_string_maps_to_status() {
        assert_eq!(
            device_from_entry("10.0.0.1", &entry("true", None, None)).status,
            DeviceStatus::Online
        );
        assert_eq!(
            device_from_entry("10.0.0.1", &entry("false", None, None)).status,
            DeviceStatus::Offline
        );
        // Anything that isn't exactly "true" is offline.
        assert_eq!(
            device_from_entry("10.0.0.1", &entry("TRUE", None, None)).status,
            DeviceStatus::Offline
        );
    }

    #[test]
    fn sentinels_become_none() {
        let d = device_from_entry(
            "10.0.0.1",
            &entry("true", Some("Location not set"), Some("Name not set")),
        );
        assert_eq!(d.location, None);
        assert_eq!(d.name, None);
        assert_eq!(d.display_name(), "10.0.0.1");
    }

    #[test]
    fn real_values_pass_through() {
        let d = device_from_entry("10.0.0.1", &entry("true", Some("PGCIL"), Some("Switch A")));
        assert_eq!(d.location.as_deref(), Some("PGCIL"));
        assert_eq!(d.display_name(), "Switch A");
    }

    #[test]
    fn last_seen_epoch_parsing() {
        let e = DeviceStatusEntry {
            online: "true".into(),
            location: None,
            name: None,
            last_seen: Some("1717430400".into()),
        };
        let d = device_from_entry("10.0.0.1", &e);
        assert_eq!(
            d.last_seen,
            DateTime::from_timestamp(1_717_430_400, 0)
        );

        let bad = DeviceStatusEntry {
            last_seen: Some("not-a-number".into()),
            ..e
        };
        assert_eq!(device_from_entry("10.0.0.1", &bad).last_seen, None);
    }

    #[test]
    fn status_map_yields_ip_sorted_devices() {
        let mut status = StatusResponse::new();
        status.insert("10.0.0.9".into(), entry("true", None, None));
        status.insert("10.0.0.10".into(), entry("false", None, None));
        status.insert("10.0.0.1".into(), entry("true", None, None));

        let devices = devices_from_status(&status);
        let ips: Vec<&str> = devices.iter().map(|d| d.ip.as_str()).collect();
        // Lexical, not numeric: "10.0.0.10" < "10.0.0.9".
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.10", "10.0.0.9"]);
    }
}
