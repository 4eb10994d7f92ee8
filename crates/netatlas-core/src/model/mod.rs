// ── Domain model ──

pub mod area;
pub mod device;
pub mod diagram;

pub use area::{Area, AreaCatalog};
pub use device::{Device, DeviceStatus};
pub use diagram::{
    DEVICE_NODE_PREFIX, DiagramEdge, DiagramNode, DiagramState, EdgeStyle, MANUAL_NODE_PREFIX,
    NodeBody, Point,
};
