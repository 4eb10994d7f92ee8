// netatlas-core: diagram layout, reconciliation, and persistence between
// netatlas-api and consumers (CLI).

pub mod convert;
pub mod diagram;
pub mod error;
pub mod layout;
pub mod model;
pub mod placement;
pub mod reconcile;
pub mod snapshot;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use diagram::{AddOutcome, Diagram, DiagramConfig};
pub use error::CoreError;
pub use placement::{PendingDevice, PlacementMode};
pub use reconcile::{Snapshot, reconcile};
pub use snapshot::{EDGES_KEY, NODES_KEY, SnapshotStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Area, AreaCatalog, Device, DeviceStatus, DiagramEdge, DiagramNode, DiagramState, EdgeStyle,
    NodeBody, Point,
};
