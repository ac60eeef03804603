//! Built-in formation generators.

use crate::rotate::{nearest_free, rotate_point};
use indexmap::IndexSet;
use muster_core::{FormationKind, GridOffset, Point};

/// One slot of a generated formation, in whole cells from the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotOffset {
    /// Cell offset from rank 0's anchor.
    pub offset: GridOffset,
    /// Placement order; rank 0 is always the anchor.
    pub rank: u32,
}

impl SlotOffset {
    /// The slot's displacement from the anchor in world units.
    pub fn to_world(&self, cell_size: f64) -> Point {
        Point::new(
            f64::from(self.offset.dx) * cell_size,
            f64::from(self.offset.dy) * cell_size,
        )
    }
}

/// Generate `count` slots of a built-in formation, rotated by `facing`
/// degrees (0 = north, clockwise).
///
/// Rank order is the generation order. Slots are pairwise distinct: a
/// point that rounds (or rotates) onto an earlier slot takes the nearest
/// free cell instead.
pub fn generate(kind: FormationKind, count: usize, facing: f64) -> Vec<SlotOffset> {
    let ideal: Vec<(f64, f64)> = match kind {
        FormationKind::Line => line(count),
        FormationKind::Wedge => wedge(count),
        FormationKind::Ring => ring(count),
        FormationKind::Block => block(count),
        FormationKind::File => file(count),
    };
    settle(&ideal, facing)
        .into_iter()
        .enumerate()
        .map(|(rank, offset)| SlotOffset {
            offset,
            rank: rank as u32,
        })
        .collect()
}

/// Rotate exact points and round them to distinct cells, in order.
pub(crate) fn settle(points: &[(f64, f64)], facing: f64) -> Vec<GridOffset> {
    let mut used: IndexSet<GridOffset> = IndexSet::with_capacity(points.len());
    for &(x, y) in points {
        let (rx, ry) = rotate_point(x, y, facing);
        let rounded = GridOffset::round(rx, ry);
        let cell = if used.contains(&rounded) {
            // A ring of radius `used.len()` always has a free cell.
            nearest_free(rx, ry, &used, None, used.len() as i32 + 1).unwrap_or(rounded)
        } else {
            rounded
        };
        used.insert(cell);
    }
    used.into_iter().collect()
}

fn line(count: usize) -> Vec<(f64, f64)> {
    let half = (count / 2) as f64;
    (0..count).map(|i| (i as f64 - half, 0.0)).collect()
}

fn wedge(count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            if i == 0 {
                return (0.0, 0.0);
            }
            let depth = ((i + 1) / 2) as f64;
            if i % 2 == 1 {
                (-depth, depth)
            } else {
                (depth, depth)
            }
        })
        .collect()
}

/// Center, then successive rings; ring `r` holds up to `8r` slots spaced
/// evenly clockwise from north.
fn ring(count: usize) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(count);
    if count == 0 {
        return out;
    }
    out.push((0.0, 0.0));
    let mut remaining = count - 1;
    let mut radius = 1usize;
    while remaining > 0 {
        let here = remaining.min(8 * radius);
        let r = radius as f64;
        for k in 0..here {
            let theta = std::f64::consts::TAU * k as f64 / here as f64;
            out.push((r * theta.sin(), -r * theta.cos()));
        }
        remaining -= here;
        radius += 1;
    }
    out
}

fn block(count: usize) -> Vec<(f64, f64)> {
    let mut side = 1usize;
    while side * side < count {
        side += 1;
    }
    let half = (side / 2) as f64;
    (0..count)
        .map(|i| ((i % side) as f64 - half, (i / side) as f64 - half))
        .collect()
}

fn file(count: usize) -> Vec<(f64, f64)> {
    (0..count).map(|i| (0.0, i as f64)).collect()
}
