//! Three-probe wall test for a single grid step.
//!
//! A lone center-to-center ray can slip past a wall that clips only part
//! of a cell edge. Two extra rays offset perpendicular to the direction of
//! travel catch those walls; the step is blocked if any ray hits.

use muster_core::{Obstruction, Point};

/// Whether moving from `from` to `to` is blocked.
///
/// `spread` is the perpendicular offset of the side probes in world
/// units. A zero-length step is never blocked.
pub fn step_blocked(walls: &dyn Obstruction, from: Point, to: Point, spread: f64) -> bool {
    if walls.blocks(from, to) {
        return true;
    }
    let d = to - from;
    let len = d.x.hypot(d.y);
    if len <= f64::EPSILON || spread <= 0.0 {
        return false;
    }
    let side = Point::new(-d.y / len, d.x / len) * spread;
    walls.blocks(from + side, to + side) || walls.blocks(from - side, to - side)
}
