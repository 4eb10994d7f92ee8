// ── Diagram state reconciliation ──
//
// Merges the three sources of truth into one consistent node/edge set:
// freshly fetched device data, the persisted snapshot of user edits, and
// the static area catalog. Pure function over explicit inputs, so every
// merge rule is testable without a rendering surface.
//
// Partition rules (by node identity):
//   * area nodes -- rebuilt from the catalog; persisted geometry
//     (position + size) wins, catalog metadata (name/color) wins
//   * `device-<ip>` nodes -- backend-owned, rebuilt wholesale
//   * everything else -- user-owned, passed through unchanged

use crate::layout;
use crate::model::{AreaCatalog, Device, DiagramEdge, DiagramNode, DiagramState, NodeBody};
use crate::snapshot::{EDGES_KEY, NODES_KEY, SnapshotStore};

/// The persisted snapshot pair, as loaded from the store. Either half may
/// be absent (first run, cleared layout, or parse failure).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Option<Vec<DiagramNode>>,
    pub edges: Option<Vec<DiagramEdge>>,
}

impl Snapshot {
    /// Load both keys from the store.
    pub fn load(store: &SnapshotStore) -> Self {
        Self {
            nodes: store.load(NODES_KEY),
            edges: store.load(EDGES_KEY),
        }
    }
}

/// Merge persisted state, fresh device data, and the area catalog into
/// the next diagram state.
///
/// Reconciling twice with unchanged inputs yields an identical state --
/// the refresh cycle depends on that idempotence.
pub fn reconcile(
    snapshot: &Snapshot,
    devices: &[Device],
    catalog: &AreaCatalog,
    show_areas: bool,
) -> DiagramState {
    let persisted: &[DiagramNode] = snapshot.nodes.as_deref().unwrap_or(&[]);

    let mut nodes = Vec::with_capacity(catalog.len() + devices.len());

    if show_areas {
        for mut area_node in layout::area_nodes(catalog) {
            if let Some(saved) = persisted.iter().find(|n| n.id == area_node.id) {
                apply_saved_geometry(&mut area_node, saved);
            }
            nodes.push(area_node);
        }
    }

    nodes.extend(layout::device_nodes(devices, catalog));

    for node in persisted {
        if !node.is_area() && !node.is_backend_device() {
            nodes.push(node.clone());
        }
    }

    DiagramState {
        nodes,
        edges: snapshot.edges.clone().unwrap_or_default(),
    }
}

/// Overlay a saved node's geometry onto a freshly built area node.
///
/// Position always transfers; width/height transfer when the saved node
/// is an area body. Metadata (name, color) stays canonical.
pub(crate) fn apply_saved_geometry(fresh: &mut DiagramNode, saved: &DiagramNode) {
    fresh.position = saved.position;

    if let (
        NodeBody::Area { width, height, .. },
        NodeBody::Area {
            width: saved_width,
            height: saved_height,
            ..
        },
    ) = (&mut fresh.body, &saved.body)
    {
        *width = *saved_width;
        *height = *saved_height;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Area, DeviceStatus, Point};

    fn catalog() -> AreaCatalog {
        AreaCatalog::new(vec![Area {
            id: "PGCIL".into(),
            name: "PGCIL".into(),
            color: "#1d4ed8".into(),
            x: 20.0,
            y: 20.0,
            width: 300.0,
            height: 250.0,
        }])
    }

    fn device(ip: &str, status: DeviceStatus) -> Device {
        Device {
            ip: ip.into(),
            name: None,
            location: Some("PGCIL".into()),
            status,
            last_seen: None,
        }
    }

    fn manual_node(n: u64) -> DiagramNode {
        DiagramNode {
            id: DiagramNode::manual_node_id(n),
            position: Point::new(150.0, 200.0),
            body: NodeBody::Device {
                label: "printer".into(),
                ip: "10.0.0.42".into(),
                name: "printer".into(),
                location: "Unknown".into(),
                status: DeviceStatus::Online,
            },
        }
    }

    #[test]
    fn fresh_reconcile_builds_areas_and_devices() {
        let devices = vec![
            device("10.0.0.1", DeviceStatus::Online),
            device("10.0.0.2", DeviceStatus::Offline),
        ];

        let state = reconcile(&Snapshot::default(), &devices, &catalog(), true);

        assert_eq!(state.nodes.len(), 3);
        assert!(state.nodes[0].is_area());
        assert_eq!(state.nodes[1].id, "device-10.0.0.1");
        assert_eq!(state.nodes[2].id, "device-10.0.0.2");
        assert!(state.edges.is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let devices = vec![
            device("10.0.0.1", DeviceStatus::Online),
            device("10.0.0.2", DeviceStatus::Offline),
        ];
        let cat = catalog();

        let first = reconcile(&Snapshot::default(), &devices, &cat, true);
        let again = Snapshot {
            nodes: Some(first.nodes.clone()),
            edges: Some(first.edges.clone()),
        };
        let second = reconcile(&again, &devices, &cat, true);

        assert_eq!(first, second);
        // Byte-for-byte after serialization, per the refresh contract.
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json"),
        );
    }

    #[test]
    fn persisted_area_geometry_wins_metadata_does_not() {
        let saved_area = DiagramNode {
            id: "PGCIL".into(),
            position: Point::new(5.0, 7.0),
            body: NodeBody::Area {
                name: "stale name".into(),
                color: "#000000".into(),
                width: 640.0,
                height: 480.0,
            },
        };
        let snapshot = Snapshot {
            nodes: Some(vec![saved_area]),
            edges: None,
        };

        let devices = vec![device("10.0.0.1", DeviceStatus::Online)];
        let state = reconcile(&snapshot, &devices, &catalog(), true);

        let area = state.node("PGCIL").expect("area node");
        assert_eq!(area.position, Point::new(5.0, 7.0));
        match &area.body {
            NodeBody::Area { name, color, width, height } => {
                assert_eq!((*width, *height), (640.0, 480.0));
                assert_eq!(name, "PGCIL");
                assert_eq!(color, "#1d4ed8");
            }
            NodeBody::Device { .. } => panic!("expected area body"),
        }
    }

    #[test]
    fn geometry_override_survives_device_churn() {
        let mut snapshot = Snapshot::default();
        let resized = {
            let devices = vec![device("10.0.0.1", DeviceStatus::Online)];
            let mut state = reconcile(&snapshot, &devices, &catalog(), true);
            if let Some(n) = state.nodes.iter_mut().find(|n| n.id == "PGCIL") {
                n.position = Point::new(0.0, 0.0);
                if let NodeBody::Area { width, .. } = &mut n.body {
                    *width = 999.0;
                }
            }
            state
        };
        snapshot.nodes = Some(resized.nodes);

        // Backend device list changes entirely; the resize sticks.
        let devices = vec![
            device("10.0.0.7", DeviceStatus::Online),
            device("10.0.0.8", DeviceStatus::Online),
        ];
        let state = reconcile(&snapshot, &devices, &catalog(), true);

        let area = state.node("PGCIL").expect("area node");
        assert_eq!(area.position, Point::new(0.0, 0.0));
        match &area.body {
            NodeBody::Area { width, .. } => assert_eq!(*width, 999.0),
            NodeBody::Device { .. } => panic!("expected area body"),
        }
    }

    #[test]
    fn manual_nodes_pass_through_unchanged() {
        let snapshot = Snapshot {
            nodes: Some(vec![manual_node(3)]),
            edges: None,
        };
        let devices = vec![device("10.0.0.1", DeviceStatus::Online)];

        let state = reconcile(&snapshot, &devices, &catalog(), true);

        let manual = state.node("manual-node-3").expect("manual node");
        assert_eq!(manual, &manual_node(3));
    }

    #[test]
    fn stale_device_nodes_are_replaced_wholesale() {
        // A persisted device node for an ip the backend no longer knows.
        let stale = DiagramNode {
            id: DiagramNode::device_node_id("10.0.0.99"),
            position: Point::new(1.0, 1.0),
            body: NodeBody::Device {
                label: "gone".into(),
                ip: "10.0.0.99".into(),
                name: "gone".into(),
                location: "PGCIL".into(),
                status: DeviceStatus::Online,
            },
        };
        let snapshot = Snapshot {
            nodes: Some(vec![stale]),
            edges: None,
        };

        let state = reconcile(&snapshot, &[], &catalog(), true);
        assert!(state.device_node("10.0.0.99").is_none());
    }

    #[test]
    fn fetch_failure_keeps_manual_nodes() {
        // Empty device set (the degraded fetch result) must not disturb
        // manually placed nodes.
        let snapshot = Snapshot {
            nodes: Some(vec![manual_node(0)]),
            edges: None,
        };

        let state = reconcile(&snapshot, &[], &catalog(), true);

        assert_eq!(state.device_node_count(), 0);
        assert!(state.node("manual-node-0").is_some());
    }

    #[test]
    fn edges_come_from_snapshot_only() {
        let snapshot = Snapshot {
            nodes: None,
            edges: Some(vec![DiagramEdge::connect("PGCIL", "manual-node-0")]),
        };
        let devices = vec![device("10.0.0.1", DeviceStatus::Online)];

        let state = reconcile(&snapshot, &devices, &catalog(), true);
        assert_eq!(state.edges.len(), 1);
        assert!(state.edges[0].links("manual-node-0", "PGCIL"));
    }

    #[test]
    fn hidden_areas_drop_persisted_area_nodes() {
        let snapshot = Snapshot {
            nodes: Some(vec![
                DiagramNode {
                    id: "PGCIL".into(),
                    position: Point::new(5.0, 7.0),
                    body: NodeBody::Area {
                        name: "PGCIL".into(),
                        color: "#1d4ed8".into(),
                        width: 300.0,
                        height: 250.0,
                    },
                },
                manual_node(1),
            ]),
            edges: None,
        };

        let state = reconcile(&snapshot, &[], &catalog(), false);

        assert!(state.node("PGCIL").is_none());
        assert!(state.node("manual-node-1").is_some());
    }
}
