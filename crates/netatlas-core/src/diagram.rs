// ── Diagram controller ──
//
// Owns the live diagram state and its background tasks: a periodic
// refresh loop that re-reconciles against the backend, and a persist
// loop that debounces snapshot writes. Cheap to clone; all clones share
// one inner state. `mount` starts the tasks, `unmount` cancels and
// joins them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use netatlas_api::MonitorClient;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::CoreError;
use crate::layout;
use crate::model::{AreaCatalog, Device, DiagramEdge, DiagramNode, DiagramState, NodeBody, Point};
use crate::placement::{PendingDevice, PlacementMode};
use crate::reconcile::{self, Snapshot, reconcile};
use crate::snapshot::{EDGES_KEY, NODES_KEY, SnapshotStore};
use crate::validate;

/// Debounce window for node snapshot writes.
const NODE_PERSIST_DELAY: Duration = Duration::from_millis(50);

/// Debounce window for edge snapshot writes.
const EDGE_PERSIST_DELAY: Duration = Duration::from_millis(100);

/// Delay before the follow-up refresh after a backend add, giving the
/// monitor time to probe the new device.
const POST_ADD_REFRESH_DELAY: Duration = Duration::from_secs(1);

/// Delay before the follow-up refresh after a backend delete.
const POST_DELETE_REFRESH_DELAY: Duration = Duration::from_millis(500);

const PERSIST_CHANNEL_SIZE: usize = 64;

/// Which half of the snapshot a persist request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersistKind {
    Nodes,
    Edges,
}

impl PersistKind {
    fn delay(self) -> Duration {
        match self {
            Self::Nodes => NODE_PERSIST_DELAY,
            Self::Edges => EDGE_PERSIST_DELAY,
        }
    }
}

/// Tunables for a `Diagram`.
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    /// Interval between periodic backend refreshes. Zero disables the
    /// periodic task (manual `refresh` calls still work).
    pub refresh_interval: Duration,
    /// Whether area nodes are rendered initially.
    pub show_areas: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            show_areas: true,
        }
    }
}

/// Result of an add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Placement mode was armed: the data is staged for the next commit
    /// click and nothing was sent to the backend.
    Staged,
    /// The device was registered with the backend and a node placed by
    /// the layout engine.
    Placed { node_id: String },
}

/// The live diagram: shared state plus background refresh/persist tasks.
#[derive(Clone)]
pub struct Diagram {
    inner: Arc<DiagramInner>,
}

struct DiagramInner {
    client: MonitorClient,
    catalog: AreaCatalog,
    snapshots: SnapshotStore,
    refresh_interval: Duration,
    show_areas: AtomicBool,
    state: RwLock<DiagramState>,
    state_rev: watch::Sender<u64>,
    placement: Mutex<PlacementMode>,
    node_counter: AtomicU64,
    persist_tx: mpsc::Sender<PersistKind>,
    persist_rx: Mutex<Option<mpsc::Receiver<PersistKind>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Diagram {
    pub fn new(
        client: MonitorClient,
        catalog: AreaCatalog,
        snapshots: SnapshotStore,
        config: DiagramConfig,
    ) -> Self {
        let (persist_tx, persist_rx) = mpsc::channel(PERSIST_CHANNEL_SIZE);
        let (state_rev, _) = watch::channel(0);

        Self {
            inner: Arc::new(DiagramInner {
                client,
                catalog,
                snapshots,
                refresh_interval: config.refresh_interval,
                show_areas: AtomicBool::new(config.show_areas),
                state: RwLock::new(DiagramState::default()),
                state_rev,
                placement: Mutex::new(PlacementMode::default()),
                node_counter: AtomicU64::new(0),
                persist_tx,
                persist_rx: Mutex::new(Some(persist_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Bring the diagram up: load the persisted snapshot, reconcile it
    /// against a fresh device fetch, write the merged result back, and
    /// start the background tasks.
    ///
    /// A failed fetch degrades to an empty device set; persisted manual
    /// nodes and edges still render.
    pub async fn mount(&self) {
        let snapshot = Snapshot::load(&self.inner.snapshots);

        // Resume the manual-node counter past every persisted ordinal so
        // restored nodes are never shadowed by new placements.
        if let Some(nodes) = &snapshot.nodes {
            let next = nodes
                .iter()
                .filter_map(DiagramNode::manual_ordinal)
                .max()
                .map_or(0, |n| n + 1);
            self.inner.node_counter.store(next, Ordering::Relaxed);
        }

        let devices = self.fetch_devices().await;
        let state = reconcile(&snapshot, &devices, &self.inner.catalog, self.show_areas());
        self.replace_state(state).await;
        self.persist_now(PersistKind::Nodes).await;
        self.persist_now(PersistKind::Edges).await;

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.persist_rx.lock().await.take() {
            handles.push(tokio::spawn(persist_task(self.clone(), rx)));
        }
        if !self.inner.refresh_interval.is_zero() {
            handles.push(tokio::spawn(refresh_task(
                self.clone(),
                self.inner.refresh_interval,
            )));
        }

        info!(
            devices = devices.len(),
            refresh_interval = ?self.inner.refresh_interval,
            "diagram mounted"
        );
    }

    /// Cancel the background tasks and wait for them to finish.
    pub async fn unmount(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("diagram unmounted");
    }

    /// Re-fetch device data and reconcile it into the current state.
    ///
    /// User edits are taken from the persisted node snapshot and the
    /// in-memory edge set, so a refresh never clobbers a drag or resize
    /// that already flushed.
    pub async fn refresh(&self) {
        let devices = self.fetch_devices().await;
        let snapshot = Snapshot {
            nodes: self.inner.snapshots.load(NODES_KEY),
            edges: Some(self.inner.state.read().await.edges.clone()),
        };
        let state = reconcile(&snapshot, &devices, &self.inner.catalog, self.show_areas());
        self.replace_state(state).await;
        self.persist_now(PersistKind::Nodes).await;
        self.persist_now(PersistKind::Edges).await;
    }

    // ── State access ─────────────────────────────────────────────────

    /// A clone of the current diagram state.
    pub async fn state(&self) -> DiagramState {
        self.inner.state.read().await.clone()
    }

    /// Watch channel that ticks on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.state_rev.subscribe()
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.inner.catalog
    }

    pub fn show_areas(&self) -> bool {
        self.inner.show_areas.load(Ordering::Relaxed)
    }

    // ── User edits ───────────────────────────────────────────────────

    /// Move a node to `position`. Returns `false` for unknown ids.
    pub async fn move_node(&self, id: &str, position: Point) -> bool {
        let moved = {
            let mut state = self.inner.state.write().await;
            match state.nodes.iter_mut().find(|n| n.id == id) {
                Some(node) => {
                    node.position = position;
                    true
                }
                None => false,
            }
        };
        if moved {
            self.schedule_persist(PersistKind::Nodes).await;
            self.bump();
        }
        moved
    }

    /// Resize an area node. Returns `false` for unknown or non-area ids.
    pub async fn resize_area(&self, id: &str, width: f64, height: f64) -> bool {
        let resized = {
            let mut state = self.inner.state.write().await;
            match state.nodes.iter_mut().find(|n| n.id == id) {
                Some(node) => match &mut node.body {
                    NodeBody::Area {
                        width: w,
                        height: h,
                        ..
                    } => {
                        *w = width;
                        *h = height;
                        true
                    }
                    NodeBody::Device { .. } => false,
                },
                None => false,
            }
        };
        if resized {
            self.schedule_persist(PersistKind::Nodes).await;
            self.bump();
        }
        resized
    }

    /// Connect two nodes. Returns the edge (the existing one when the
    /// pair is already connected).
    pub async fn connect(&self, source: &str, target: &str) -> DiagramEdge {
        let edge = {
            let mut state = self.inner.state.write().await;
            if let Some(existing) = state.edges.iter().find(|e| e.links(source, target)) {
                return existing.clone();
            }
            let edge = DiagramEdge::connect(source, target);
            state.edges.push(edge.clone());
            edge
        };
        self.schedule_persist(PersistKind::Edges).await;
        self.bump();
        edge
    }

    /// Remove an edge by id. Returns `false` for unknown ids.
    pub async fn delete_edge(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.inner.state.write().await;
            let before = state.edges.len();
            state.edges.retain(|e| e.id != id);
            state.edges.len() != before
        };
        if removed {
            self.schedule_persist(PersistKind::Edges).await;
            self.bump();
        }
        removed
    }

    /// Remove a node by id. Area nodes are not deletable; edges touching
    /// the removed node go with it.
    pub async fn delete_node(&self, id: &str) -> bool {
        let (removed, edges_touched) = {
            let mut state = self.inner.state.write().await;
            let deletable = state.node(id).is_some_and(|n| !n.is_area());
            if deletable {
                state.nodes.retain(|n| n.id != id);
                let before = state.edges.len();
                state.edges.retain(|e| e.source != id && e.target != id);
                (true, state.edges.len() != before)
            } else {
                (false, false)
            }
        };
        if removed {
            self.schedule_persist(PersistKind::Nodes).await;
            if edges_touched {
                self.schedule_persist(PersistKind::Edges).await;
            }
            self.bump();
        }
        removed
    }

    /// Show or hide area nodes. Re-showing rebuilds them from the
    /// catalog with any persisted geometry applied.
    pub async fn set_show_areas(&self, show: bool) {
        self.inner.show_areas.store(show, Ordering::Relaxed);

        let persisted: Vec<DiagramNode> =
            self.inner.snapshots.load(NODES_KEY).unwrap_or_default();

        {
            let mut state = self.inner.state.write().await;
            let mut nodes = Vec::with_capacity(state.nodes.len());
            if show {
                for mut area_node in layout::area_nodes(&self.inner.catalog) {
                    if let Some(saved) = persisted.iter().find(|n| n.id == area_node.id) {
                        reconcile::apply_saved_geometry(&mut area_node, saved);
                    }
                    nodes.push(area_node);
                }
            }
            nodes.extend(state.nodes.iter().filter(|n| !n.is_area()).cloned());
            state.nodes = nodes;
        }

        self.schedule_persist(PersistKind::Nodes).await;
        self.bump();
    }

    // ── Manual placement ─────────────────────────────────────────────

    /// Toggle placement mode. Returns `true` when the mode is now armed.
    pub async fn toggle_placement_mode(&self) -> bool {
        let mut mode = self.inner.placement.lock().await;
        mode.toggle();
        mode.is_armed()
    }

    pub async fn placement_mode(&self) -> PlacementMode {
        self.inner.placement.lock().await.clone()
    }

    /// Stage device data for the next commit click. Returns `false` when
    /// placement mode is not armed.
    pub async fn stage_device(&self, data: PendingDevice) -> bool {
        self.inner.placement.lock().await.stage(data)
    }

    /// Handle a canvas click.
    ///
    /// When placement mode is armed with staged data, places a manual
    /// node at exactly `point`, disarms, and returns the node. Otherwise
    /// a no-op returning `None`.
    pub async fn click(&self, point: Point) -> Option<DiagramNode> {
        let pending = self.inner.placement.lock().await.take_commit()?;

        let ordinal = self.inner.node_counter.fetch_add(1, Ordering::Relaxed);
        let node = DiagramNode {
            id: DiagramNode::manual_node_id(ordinal),
            position: point,
            body: NodeBody::Device {
                label: pending.name.clone(),
                ip: pending.ip,
                name: pending.name,
                location: pending.location,
                status: pending.status,
            },
        };

        {
            let mut state = self.inner.state.write().await;
            state.nodes.push(node.clone());
        }
        // A committed placement must survive an immediate teardown, so
        // it writes through instead of waiting out the debounce window.
        self.persist_now(PersistKind::Nodes).await;
        self.bump();

        info!(node = %node.id, x = point.x, y = point.y, "manual node placed");
        Some(node)
    }

    // ── Backend mutations ────────────────────────────────────────────

    /// Add a device.
    ///
    /// With placement mode armed, the data is staged for the next commit
    /// click instead. Otherwise the backend registers the device and a
    /// node is placed immediately by the layout engine; a delayed
    /// refresh follows so the backend's first probe result lands.
    pub async fn add_device(&self, data: PendingDevice) -> Result<AddOutcome, CoreError> {
        validate::validate_add(&data.ip, &data.location, &data.name)?;

        {
            let mut mode = self.inner.placement.lock().await;
            if mode.is_armed() {
                mode.stage(data);
                return Ok(AddOutcome::Staged);
            }
        }

        self.inner
            .client
            .add_device(&data.ip, &data.location, &data.name)
            .await?;

        let node_id = {
            let mut state = self.inner.state.write().await;
            let position = match self.inner.catalog.by_name(&data.location) {
                Some(area) => {
                    layout::append_position(area, layout::occupancy(&state, &data.location))
                }
                None => layout::overflow_position(state.device_node_count()),
            };
            let node = DiagramNode {
                id: DiagramNode::device_node_id(&data.ip),
                position,
                body: NodeBody::Device {
                    label: data.name.clone(),
                    ip: data.ip.clone(),
                    name: data.name.clone(),
                    location: data.location.clone(),
                    status: data.status,
                },
            };
            // One backend node per ip: re-adding replaces.
            state.nodes.retain(|n| n.id != node.id);
            state.nodes.push(node.clone());
            node.id
        };

        self.persist_now(PersistKind::Nodes).await;
        self.bump();
        self.spawn_delayed_refresh(POST_ADD_REFRESH_DELAY);

        info!(ip = %data.ip, location = %data.location, "device added");
        Ok(AddOutcome::Placed { node_id })
    }

    /// Remove a device from the backend and drop every node carrying its
    /// ip, manual placements included.
    pub async fn delete_device(&self, ip: &str) -> Result<(), CoreError> {
        validate::validate_delete(ip)?;

        {
            let mut state = self.inner.state.write().await;
            state.nodes.retain(|n| n.device_ip() != Some(ip));
        }
        self.persist_now(PersistKind::Nodes).await;
        self.bump();

        self.inner.client.delete_device(ip).await?;
        self.spawn_delayed_refresh(POST_DELETE_REFRESH_DELAY);

        info!(ip = %ip, "device deleted");
        Ok(())
    }

    /// Discard every user edit: clear the snapshot store and rebuild the
    /// diagram from the catalog and a fresh fetch alone.
    pub async fn reset_layout(&self) {
        self.inner.snapshots.clear();

        let devices = self.fetch_devices().await;
        let state = reconcile(
            &Snapshot::default(),
            &devices,
            &self.inner.catalog,
            self.show_areas(),
        );
        self.replace_state(state).await;
        info!("layout reset");
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn fetch_devices(&self) -> Vec<Device> {
        match self.inner.client.status().await {
            Ok(status) => convert::devices_from_status(&status),
            Err(e) => {
                warn!(error = %e, "device fetch failed, rendering empty device set");
                Vec::new()
            }
        }
    }

    async fn replace_state(&self, state: DiagramState) {
        *self.inner.state.write().await = state;
        self.bump();
    }

    fn bump(&self) {
        self.inner.state_rev.send_modify(|rev| *rev += 1);
    }

    /// Queue a debounced persist. Falls back to a direct write when the
    /// persist task is not running (not mounted, or channel backed up).
    async fn schedule_persist(&self, kind: PersistKind) {
        if self.inner.persist_tx.try_send(kind).is_err() {
            self.persist_now(kind).await;
        }
    }

    async fn persist_now(&self, kind: PersistKind) {
        let state = self.inner.state.read().await;
        match kind {
            PersistKind::Nodes => self.inner.snapshots.save(NODES_KEY, &state.nodes),
            PersistKind::Edges => self.inner.snapshots.save(EDGES_KEY, &state.edges),
        }
    }

    fn spawn_delayed_refresh(&self, delay: Duration) {
        let diagram = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => diagram.refresh().await,
            }
        });
    }
}

/// Debounced snapshot writer.
///
/// Collects persist requests arriving within one delay window into a
/// single write per kind, always serializing the state as it stands at
/// flush time.
async fn persist_task(diagram: Diagram, mut rx: mpsc::Receiver<PersistKind>) {
    let cancel = diagram.inner.cancel.clone();

    loop {
        let first = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            req = rx.recv() => match req {
                Some(kind) => kind,
                None => break,
            },
        };

        let mut nodes_dirty = first == PersistKind::Nodes;
        let mut edges_dirty = first == PersistKind::Edges;

        let window = tokio::time::sleep(first.delay());
        tokio::pin!(window);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                () = &mut window => break,
                req = rx.recv() => match req {
                    Some(PersistKind::Nodes) => nodes_dirty = true,
                    Some(PersistKind::Edges) => edges_dirty = true,
                    None => break,
                },
            }
        }

        let state = diagram.inner.state.read().await.clone();
        if nodes_dirty {
            diagram.inner.snapshots.save(NODES_KEY, &state.nodes);
        }
        if edges_dirty {
            diagram.inner.snapshots.save(EDGES_KEY, &state.edges);
        }
    }
}

/// Periodic backend refresh loop. The first interval tick fires
/// immediately and is consumed; `mount` already did that fetch.
async fn refresh_task(diagram: Diagram, every: Duration) {
    let cancel = diagram.inner.cancel.clone();
    let mut interval = tokio::time::interval(every);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => diagram.refresh().await,
        }
    }
}
