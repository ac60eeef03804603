//! Membership oracle for cells reachable from an origin.

use muster_core::{CellKey, Point};
use std::collections::HashSet;

/// Cells reachable from one origin without crossing a wall.
///
/// Built by [`Placer::build_reachable_set`](crate::Placer::build_reachable_set).
/// Only answers membership questions; it deliberately offers no
/// iteration, since its internal order carries no meaning.
#[derive(Clone, Debug)]
pub struct ReachableSet {
    origin: Option<CellKey>,
    cells: HashSet<CellKey>,
}

impl ReachableSet {
    pub(crate) fn new(origin: Option<CellKey>, cells: HashSet<CellKey>) -> Self {
        Self { origin, cells }
    }

    /// Key of the origin cell, or `None` if the origin was outside the scene.
    pub fn origin(&self) -> Option<CellKey> {
        self.origin
    }

    /// Whether the cell with this center is reachable.
    pub fn contains_center(&self, center: Point) -> bool {
        self.cells.contains(&CellKey::from_center(center))
    }

    /// Whether the cell with this key is reachable.
    pub fn contains(&self, key: CellKey) -> bool {
        self.cells.contains(&key)
    }

    /// Number of reachable cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing is reachable (origin outside the scene).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
