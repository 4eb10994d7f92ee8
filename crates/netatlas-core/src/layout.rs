// ── Layout engine ──
//
// Pure placement arithmetic: given the device set and the area catalog,
// compute where each device node sits. Devices assigned to an area pack
// row-by-row inside its bounds; unassigned devices land on a fixed
// overflow grid to the right of the canvas. No I/O, no side effects --
// identical inputs always produce identical output, provided the device
// slice is in a stable order (callers pass the ip-sorted order the
// status map decodes into).

use crate::model::{Area, AreaCatalog, Device, DiagramNode, DiagramState, NodeBody, Point};

/// Approximate rendered width of a device node, including spacing.
pub const NODE_WIDTH: f64 = 120.0;

/// Combined left/right padding inside an area.
pub const AREA_PADDING: f64 = 100.0;

/// Left inset of the first column from the area origin.
const START_PADDING_X: f64 = 50.0;

/// Top inset of the first row, leaving room for the area title.
const START_PADDING_Y: f64 = 80.0;

/// Vertical spacing between rows.
const ROW_SPACING: f64 = 70.0;

/// Right/bottom clamp margins: nodes never cross these insets, so devices
/// beyond an area's capacity stack on the last valid cell rather than
/// escaping the box.
const CLAMP_MARGIN_X: f64 = 100.0;
const CLAMP_MARGIN_Y: f64 = 60.0;

/// Overflow grid for devices with no matching area.
const OVERFLOW_ORIGIN_X: f64 = 600.0;
const OVERFLOW_ORIGIN_Y: f64 = 50.0;
const OVERFLOW_SPACING_X: f64 = 150.0;
const OVERFLOW_SPACING_Y: f64 = 80.0;
const OVERFLOW_COLUMNS: usize = 3;

/// Compute the position for `device`.
///
/// `all` is the full current device set (used to derive the device's
/// ordinal among devices sharing its area); `index` is the device's
/// position within `all`, used only for the overflow grid.
pub fn compute_position(
    device: &Device,
    all: &[Device],
    catalog: &AreaCatalog,
    index: usize,
) -> Point {
    let area = device
        .location
        .as_deref()
        .and_then(|loc| catalog.by_name(loc));

    match area {
        Some(area) => area_position(area, area_ordinal(device, all)),
        None => overflow_position(index),
    }
}

/// Grid cell position for the `ordinal`-th device inside `area`.
pub fn area_position(area: &Area, ordinal: usize) -> Point {
    let available = area.width - AREA_PADDING;
    let per_row = (available / NODE_WIDTH).floor().max(1.0);
    let per_row_cells = per_row as usize;

    let row = ordinal / per_row_cells;
    let col = ordinal % per_row_cells;

    let spacing_x = NODE_WIDTH.min(available / per_row);

    let x = area.x + START_PADDING_X + (col as f64) * spacing_x;
    let y = area.y + START_PADDING_Y + (row as f64) * ROW_SPACING;

    Point {
        x: x.min(area.x + area.width - CLAMP_MARGIN_X),
        y: y.min(area.y + area.height - CLAMP_MARGIN_Y),
    }
}

/// Fixed 3-column grid for devices with no matching area.
pub fn overflow_position(index: usize) -> Point {
    Point {
        x: OVERFLOW_ORIGIN_X + ((index % OVERFLOW_COLUMNS) as f64) * OVERFLOW_SPACING_X,
        y: OVERFLOW_ORIGIN_Y + ((index / OVERFLOW_COLUMNS) as f64) * OVERFLOW_SPACING_Y,
    }
}

/// The device's ordinal among all devices assigned to the same area,
/// in the iteration order of `all`.
fn area_ordinal(device: &Device, all: &[Device]) -> usize {
    all.iter()
        .filter(|d| d.location == device.location)
        .position(|d| d.ip == device.ip)
        .unwrap_or(0)
}

/// Build the backend-derived device node for one device.
pub fn device_node(device: &Device, all: &[Device], catalog: &AreaCatalog, index: usize) -> DiagramNode {
    DiagramNode {
        id: DiagramNode::device_node_id(&device.ip),
        position: compute_position(device, all, catalog, index),
        body: NodeBody::Device {
            label: device.display_name().to_owned(),
            ip: device.ip.clone(),
            name: device.display_name().to_owned(),
            location: device
                .location
                .clone()
                .unwrap_or_else(|| "Unknown".to_owned()),
            status: device.status,
        },
    }
}

/// Build device nodes for the full device set.
pub fn device_nodes(devices: &[Device], catalog: &AreaCatalog) -> Vec<DiagramNode> {
    devices
        .iter()
        .enumerate()
        .map(|(index, device)| device_node(device, devices, catalog, index))
        .collect()
}

/// Build area nodes from the catalog, at their canonical geometry.
pub fn area_nodes(catalog: &AreaCatalog) -> Vec<DiagramNode> {
    catalog
        .iter()
        .map(|area| DiagramNode {
            id: area.id.clone(),
            position: Point::new(area.x, area.y),
            body: NodeBody::Area {
                name: area.name.clone(),
                color: area.color.clone(),
                width: area.width,
                height: area.height,
            },
        })
        .collect()
}

/// The position a newly added device takes inside `area`, given how many
/// device nodes currently occupy it.
pub fn append_position(area: &Area, occupied: usize) -> Point {
    area_position(area, occupied)
}

/// Count the device nodes currently assigned to `location`.
pub fn occupancy(state: &DiagramState, location: &str) -> usize {
    state
        .nodes
        .iter()
        .filter(|n| matches!(&n.body, NodeBody::Device { location: l, .. } if l == location))
        .count()
}
