// ── Diagram node/edge types ──
//
// These are the persisted shapes: the snapshot store serializes node and
// edge arrays verbatim, and reconciliation compares them structurally.
// Node identity carries the partitioning rules -- `device-<ip>` ids are
// backend-owned and rebuilt wholesale on refresh, `manual-node-<n>` ids
// and anything else non-area pass through untouched.

use serde::{Deserialize, Serialize};

use super::device::DeviceStatus;

/// Id prefix for nodes derived from backend device data.
pub const DEVICE_NODE_PREFIX: &str = "device-";

/// Id prefix for manually placed nodes.
pub const MANUAL_NODE_PREFIX: &str = "manual-node-";

/// A 2D position on the diagram canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node payload, tagged by kind in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    /// A rendered area region. Non-deletable, non-draggable, resizable;
    /// `width`/`height` live here so user resizes persist with the node.
    Area {
        name: String,
        color: String,
        width: f64,
        height: f64,
    },
    /// A rendered device. Deletable and draggable.
    Device {
        label: String,
        ip: String,
        name: String,
        location: String,
        status: DeviceStatus,
    },
}

/// A positioned visual element of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub position: Point,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl DiagramNode {
    /// The id of the backend-derived node for `ip`. At most one node with
    /// this id exists at any time.
    pub fn device_node_id(ip: &str) -> String {
        format!("{DEVICE_NODE_PREFIX}{ip}")
    }

    /// The id of the `n`-th manually placed node.
    pub fn manual_node_id(n: u64) -> String {
        format!("{MANUAL_NODE_PREFIX}{n}")
    }

    pub fn is_area(&self) -> bool {
        matches!(self.body, NodeBody::Area { .. })
    }

    /// `true` for nodes owned by backend device data (destroyed and
    /// recreated on every refresh).
    pub fn is_backend_device(&self) -> bool {
        matches!(self.body, NodeBody::Device { .. }) && self.id.starts_with(DEVICE_NODE_PREFIX)
    }

    /// The counter value of a `manual-node-<n>` id, if this is one.
    pub fn manual_ordinal(&self) -> Option<u64> {
        self.id.strip_prefix(MANUAL_NODE_PREFIX)?.parse().ok()
    }

    /// The device ip this node represents, if it is a device node.
    pub fn device_ip(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Device { ip, .. } => Some(ip),
            NodeBody::Area { .. } => None,
        }
    }
}

/// Stroke styling carried on every edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: "#3b82f6".into(),
            stroke_width: 2.0,
        }
    }
}

/// An undirected connection between two node ids. User-created only;
/// never derived from device data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl DiagramEdge {
    /// Build an edge with the deterministic `edge-<source>--<target>` id
    /// and default styling. The `--` separator cannot occur inside the
    /// generated node id schemes, so distinct pairs get distinct ids.
    pub fn connect(source: &str, target: &str) -> Self {
        Self {
            id: format!("edge-{source}--{target}"),
            source: source.to_owned(),
            target: target.to_owned(),
            style: EdgeStyle::default(),
        }
    }

    /// Undirected endpoint check.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// The complete in-memory diagram: what gets rendered and what gets
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramState {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl DiagramState {
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The backend-derived node for `ip`, if present.
    pub fn device_node(&self, ip: &str) -> Option<&DiagramNode> {
        self.node(&DiagramNode::device_node_id(ip))
    }

    pub fn device_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_backend_device()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_ids_are_unambiguous_for_dashed_node_ids() {
        // Node ids carry single dashes themselves (device-<ip>,
        // manual-node-<n>, area slugs), so the separator must not be
        // confusable with them.
        let a = DiagramEdge::connect("plant-area", "device-10.0.0.1");
        let b = DiagramEdge::connect("plant", "area-device-10.0.0.1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id, "edge-plant-area--device-10.0.0.1");
    }

    #[test]
    fn links_is_undirected() {
        let edge = DiagramEdge::connect("a", "b");
        assert!(edge.links("a", "b"));
        assert!(edge.links("b", "a"));
        assert!(!edge.links("a", "c"));
    }
}
