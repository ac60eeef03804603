//! Rotation about the anchor and collision-free rounding.
//!
//! Facing is in degrees, 0 = north, growing clockwise on screen (where
//! `y` points down). Quarter turns are applied with exact integer
//! arithmetic so that 0°, 90°, 180°, 270° and any multiple of 360°
//! never pick up floating-point drift.

use indexmap::IndexSet;
use muster_core::GridOffset;

/// Rotate an exact point about the origin by `facing` degrees.
pub fn rotate_point(x: f64, y: f64, facing: f64) -> (f64, f64) {
    let f = facing.rem_euclid(360.0);
    if f == 0.0 {
        (x, y)
    } else if f == 90.0 {
        (-y, x)
    } else if f == 180.0 {
        (-x, -y)
    } else if f == 270.0 {
        (y, -x)
    } else {
        let (sin, cos) = f.to_radians().sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }
}

/// Rotate a grid offset and round back to whole cells.
pub fn rotate_offset(offset: GridOffset, facing: f64) -> GridOffset {
    let (x, y) = rotate_point(f64::from(offset.dx), f64::from(offset.dy), facing);
    GridOffset::round(x, y)
}

/// Rotate a whole arrangement of offsets by `facing` degrees.
///
/// Offsets are rounded in order; one that lands on a cell already taken
/// moves to the nearest free cell. The origin stays put and is reserved
/// before anything else is placed.
pub fn rotate_offsets(offsets: &[GridOffset], facing: f64) -> Vec<GridOffset> {
    let mut used: IndexSet<GridOffset> = offsets.iter().copied().filter(|o| o.is_origin()).collect();
    offsets
        .iter()
        .map(|&o| {
            if o.is_origin() {
                return o;
            }
            let (x, y) = rotate_point(f64::from(o.dx), f64::from(o.dy), facing);
            let rounded = GridOffset::round(x, y);
            let cell = if used.contains(&rounded) {
                nearest_free(x, y, &used, None, used.len() as i32 + 1).unwrap_or(rounded)
            } else {
                rounded
            };
            used.insert(cell);
            cell
        })
        .collect()
}

/// The free cell nearest to the exact point `(x, y)`.
///
/// Scans Chebyshev rings of radius `0..=max_radius` around the rounded
/// point and returns the closest unused cell (Euclidean distance to the
/// exact point) from the first ring that has one; ties keep scan order.
/// With `bound = Some(n)` only cells inside `-n..=n` on both axes count.
pub fn nearest_free(
    x: f64,
    y: f64,
    used: &IndexSet<GridOffset>,
    bound: Option<i32>,
    max_radius: i32,
) -> Option<GridOffset> {
    let center = GridOffset::round(x, y);
    let allowed = |c: GridOffset| {
        !used.contains(&c) && bound.map_or(true, |n| c.dx.abs() <= n && c.dy.abs() <= n)
    };
    for r in 0..=max_radius {
        let mut best: Option<(f64, GridOffset)> = None;
        for cell in ring(center, r) {
            if !allowed(cell) {
                continue;
            }
            let d = (f64::from(cell.dx) - x).hypot(f64::from(cell.dy) - y);
            if best.map_or(true, |(bd, _)| d < bd - 1e-9) {
                best = Some((d, cell));
            }
        }
        if let Some((_, cell)) = best {
            return Some(cell);
        }
    }
    None
}

/// Cells on the Chebyshev ring of radius `r` around `center`, clockwise
/// from the top-left corner.
fn ring(center: GridOffset, r: i32) -> impl Iterator<Item = GridOffset> {
    let (cx, cy) = (center.dx, center.dy);
    let top = (-r..=r).map(move |dx| (dx, -r));
    let right = (-r + 1..=r).map(move |dy| (r, dy));
    let bottom = (-r..r).rev().map(move |dx| (dx, r));
    let left = (-r + 1..r).rev().map(move |dy| (-r, dy));
    let cells: Vec<(i32, i32)> = if r == 0 {
        vec![(0, 0)]
    } else {
        top.chain(right).chain(bottom).chain(left).collect()
    };
    cells
        .into_iter()
        .map(move |(dx, dy)| GridOffset::new(cx + dx, cy + dy))
}
