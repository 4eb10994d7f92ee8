// ── Area catalog types ──
//
// Areas are named rectangular regions of the diagram representing logical
// network zones. The catalog is static configuration: loaded once at
// startup, immutable at runtime. User-driven resizes of the *rendered*
// area node are persisted separately in the snapshot store and never
// written back here.

use serde::{Deserialize, Serialize};

/// A named rectangular region of the diagram.
///
/// Devices are assigned to an area by matching their `location` field
/// against `name` (the join key). `id` identifies the rendered area node
/// and stays stable across reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The full set of configured areas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaCatalog {
    areas: Vec<Area>,
}

impl AreaCatalog {
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }

    /// Look up an area by its join key (`name`).
    pub fn by_name(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.name == name)
    }

    /// Look up an area by node id.
    pub fn by_id(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl<'a> IntoIterator for &'a AreaCatalog {
    type Item = &'a Area;
    type IntoIter = std::slice::Iter<'a, Area>;

    fn into_iter(self) -> Self::IntoIter {
        self.areas.iter()
    }
}
