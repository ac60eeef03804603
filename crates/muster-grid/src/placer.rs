//! Breadth-first flood fill over the 8-connected cell lattice.

use crate::config::PlacerConfig;
use crate::occupancy::OccupancyMap;
use crate::probe::step_blocked;
use crate::reachable::ReachableSet;
use muster_core::{CellKey, Point, SceneView, TokenSet};
use std::collections::{HashSet, VecDeque};
use std::ops::ControlFlow;
use tracing::debug;

/// All 8 steps as `(dx, dy)`: N, S, W, E, NW, NE, SW, SE.
///
/// Cardinals first, so ties in walking distance favour orthogonal cells.
const OFFSETS_8: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// A free cell found by [`Placer::find_reachable_candidates`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// World position of the cell's top-left corner.
    pub top_left: Point,
    /// World position of the cell's center.
    pub center: Point,
    /// Walking distance from the origin cell, in steps.
    pub distance: u32,
}

impl Candidate {
    /// Hash key of this cell.
    pub fn key(&self) -> CellKey {
        CellKey::from_center(self.center)
    }
}

/// Why a flood fill stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloodEnd {
    /// The caller's quota was met.
    QuotaMet,
    /// Every reachable cell was visited.
    Exhausted,
    /// The iteration ceiling was hit before either of the above.
    Ceiling,
}

/// Wall-aware search for cells around a point.
///
/// Borrows the scene for its lifetime; construct one per operation.
pub struct Placer<'a> {
    scene: SceneView<'a>,
    config: PlacerConfig,
}

impl<'a> Placer<'a> {
    /// Create a placer over `scene`.
    pub fn new(scene: SceneView<'a>, config: PlacerConfig) -> Self {
        Self { scene, config }
    }

    /// The scene this placer searches.
    pub fn scene(&self) -> &SceneView<'a> {
        &self.scene
    }

    /// Tuning in effect.
    pub fn config(&self) -> &PlacerConfig {
        &self.config
    }

    /// Top-left corner of the cell whose center is nearest to `origin`.
    pub fn origin_top_left(&self, origin: Point) -> Point {
        let half = self.scene.cell_size() / 2.0;
        self.scene
            .grid
            .snap_top_left(Point::new(origin.x - half, origin.y - half))
    }

    /// Up to `desired` free cells nearest to `origin` by walking distance.
    ///
    /// Cells overlapping any occupant not in `exclude` are skipped but still
    /// walked through; only walls stop the search. The result is sorted by
    /// ascending distance and may be shorter than `desired` when the
    /// reachable area or the iteration ceiling runs out first.
    pub fn find_reachable_candidates(
        &self,
        origin: Point,
        desired: usize,
        exclude: &TokenSet,
    ) -> Vec<Candidate> {
        if desired == 0 {
            return Vec::new();
        }
        let margin = self.config.overlap_margin * self.scene.cell_size();
        let occupancy = OccupancyMap::capture(&self.scene, exclude, margin);
        let mut found = Vec::with_capacity(desired);
        let end = self.flood(origin, self.config.iteration_ceiling(desired), |cell| {
            if occupancy.is_free(cell.top_left) {
                found.push(cell);
            }
            if found.len() >= desired {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found.sort_by_key(|c| c.distance);
        debug!(
            desired,
            found = found.len(),
            occupants = occupancy.len(),
            end = ?end,
            "candidate search finished"
        );
        found
    }

    /// Every cell reachable from `origin`, up to `cell_budget` cells.
    ///
    /// Occupancy is ignored: callers validate specific targets against
    /// this set and check occupancy themselves.
    pub fn build_reachable_set(&self, origin: Point, cell_budget: usize) -> ReachableSet {
        let mut cells = HashSet::with_capacity(cell_budget);
        let mut origin_key = None;
        if cell_budget > 0 {
            let end = self.flood(origin, self.config.iteration_ceiling(cell_budget), |cell| {
                if cell.distance == 0 {
                    origin_key = Some(cell.key());
                }
                cells.insert(cell.key());
                if cells.len() >= cell_budget {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
            debug!(cell_budget, reached = cells.len(), end = ?end, "reachable set built");
        }
        ReachableSet::new(origin_key, cells)
    }

    /// Whether one step of `(dx, dy)` cells from the cell centered at
    /// `from` is open.
    ///
    /// Diagonal steps also need at least one orthogonal leg to be open.
    pub fn can_step(&self, from: Point, dx: i32, dy: i32) -> bool {
        let cs = self.scene.cell_size();
        let spread = self.config.probe_spread * cs;
        let walls = self.scene.walls;
        let to = Point::new(from.x + f64::from(dx) * cs, from.y + f64::from(dy) * cs);
        if step_blocked(walls, from, to, spread) {
            return false;
        }
        if dx == 0 || dy == 0 {
            return true;
        }
        let leg_x = Point::new(to.x, from.y);
        let leg_y = Point::new(from.x, to.y);
        !step_blocked(walls, from, leg_x, spread) || !step_blocked(walls, from, leg_y, spread)
    }

    /// Breadth-first walk from the origin cell, calling `visit` on every
    /// dequeued cell in non-decreasing distance order.
    fn flood(
        &self,
        origin: Point,
        ceiling: usize,
        mut visit: impl FnMut(Candidate) -> ControlFlow<()>,
    ) -> FloodEnd {
        let cs = self.scene.cell_size();
        let half = cs / 2.0;
        let bounds = self.scene.grid.bounds();
        let base = self.origin_top_left(origin);
        let cell = |i: i32, j: i32, distance: u32| {
            let top_left = Point::new(base.x + f64::from(i) * cs, base.y + f64::from(j) * cs);
            Candidate {
                top_left,
                center: Point::new(top_left.x + half, top_left.y + half),
                distance,
            }
        };

        if !bounds.contains(cell(0, 0, 0).center) {
            debug!(origin = %origin, "flood origin outside scene bounds");
            return FloodEnd::Exhausted;
        }

        let mut visited: HashSet<(i32, i32)> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert((0, 0));
        queue.push_back((0i32, 0i32, 0u32));
        let mut iterations = 0usize;

        while let Some((i, j, dist)) = queue.pop_front() {
            if iterations >= ceiling {
                return FloodEnd::Ceiling;
            }
            iterations += 1;
            let here = cell(i, j, dist);
            if visit(here).is_break() {
                return FloodEnd::QuotaMet;
            }
            for (dx, dy) in OFFSETS_8 {
                let next = (i + dx, j + dy);
                if visited.contains(&next) {
                    continue;
                }
                if !bounds.contains(cell(next.0, next.1, 0).center) {
                    continue;
                }
                if !self.can_step(here.center, dx, dy) {
                    continue;
                }
                visited.insert(next);
                queue.push_back((next.0, next.1, dist + 1));
            }
        }
        FloodEnd::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_core::{Footprint, TokenId};
    use muster_test_utils::GridScene;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    // ── Reachable set ──────────────────────────────────────────

    #[test]
    fn open_floor_contains_origin_and_ring() {
        let scene = GridScene::new(100.0, 40, 40);
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        let set = placer.build_reachable_set(p(2050.0, 2050.0), 400);
        assert_eq!(set.len(), 400);
        assert_eq!(set.origin(), Some(CellKey(2050, 2050)));
        for (dx, dy) in OFFSETS_8 {
            let c = p(2050.0 + 100.0 * f64::from(dx), 2050.0 + 100.0 * f64::from(dy));
            assert!(set.contains_center(c), "neighbour {c} missing");
        }
    }

    #[test]
    fn wall_splits_the_floor() {
        let scene = GridScene::new(100.0, 10, 10).with_wall((300.0, 0.0), (300.0, 1000.0));
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        let set = placer.build_reachable_set(p(150.0, 150.0), 1000);
        assert_eq!(set.len(), 30);
        assert!(set.contains_center(p(250.0, 950.0)));
        assert!(!set.contains_center(p(350.0, 150.0)));
    }

    #[test]
    fn origin_outside_bounds_reaches_nothing() {
        let scene = GridScene::new(100.0, 5, 5);
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        let set = placer.build_reachable_set(p(-250.0, 50.0), 100);
        assert!(set.is_empty());
        assert_eq!(set.origin(), None);
        assert!(placer
            .find_reachable_candidates(p(-250.0, 50.0), 3, &TokenSet::new())
            .is_empty());
    }

    #[test]
    fn zero_budget_is_empty() {
        let scene = GridScene::new(100.0, 5, 5);
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        assert!(placer.build_reachable_set(p(250.0, 250.0), 0).is_empty());
    }

    // ── Step rules ─────────────────────────────────────────────

    #[test]
    fn diagonal_needs_an_open_leg() {
        // Each stub clips one side probe of one orthogonal leg and stays
        // clear of all three diagonal probes.
        let east_stub = ((200.0, 100.0), (200.0, 125.0));
        let south_stub = ((100.0, 200.0), (125.0, 200.0));
        let both = GridScene::new(100.0, 5, 5)
            .with_wall(east_stub.0, east_stub.1)
            .with_wall(south_stub.0, south_stub.1);
        let placer = Placer::new(both.view(), PlacerConfig::default());
        assert!(!placer.can_step(p(150.0, 150.0), 1, 0));
        assert!(!placer.can_step(p(150.0, 150.0), 0, 1));
        assert!(!placer.can_step(p(150.0, 150.0), 1, 1));

        let one = GridScene::new(100.0, 5, 5).with_wall(east_stub.0, east_stub.1);
        let placer = Placer::new(one.view(), PlacerConfig::default());
        assert!(!placer.can_step(p(150.0, 150.0), 1, 0));
        assert!(placer.can_step(p(150.0, 150.0), 1, 1));
    }

    // ── Candidates ─────────────────────────────────────────────

    #[test]
    fn candidates_start_at_origin_and_ascend() {
        let scene = GridScene::new(100.0, 20, 20);
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        let found = placer.find_reachable_candidates(p(1050.0, 1050.0), 12, &TokenSet::new());
        assert_eq!(found.len(), 12);
        assert_eq!(found[0].top_left, p(1000.0, 1000.0));
        assert_eq!(found[0].distance, 0);
        assert!(found[1..9].iter().all(|c| c.distance == 1));
        assert!(found[9..].iter().all(|c| c.distance == 2));
        assert!(found.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn occupied_cells_are_skipped_unless_excluded() {
        let scene = GridScene::new(100.0, 20, 20)
            .with_occupant(TokenId(1), p(1000.0, 1000.0), Footprint::UNIT)
            .with_occupant(TokenId(2), p(1000.0, 900.0), Footprint::UNIT);
        let placer = Placer::new(scene.view(), PlacerConfig::default());

        let found = placer.find_reachable_candidates(p(1050.0, 1050.0), 3, &TokenSet::new());
        assert!(found.iter().all(|c| c.top_left != p(1000.0, 1000.0)));
        assert!(found.iter().all(|c| c.top_left != p(1000.0, 900.0)));
        assert_eq!(found[0].distance, 1);

        let exclude: TokenSet = [TokenId(1)].into_iter().collect();
        let found = placer.find_reachable_candidates(p(1050.0, 1050.0), 3, &exclude);
        assert_eq!(found[0].top_left, p(1000.0, 1000.0));
    }

    #[test]
    fn enclosed_room_runs_dry() {
        // 2×2 room in the corner of a larger scene.
        let scene = GridScene::new(100.0, 10, 10)
            .with_wall((200.0, 0.0), (200.0, 200.0))
            .with_wall((0.0, 200.0), (200.0, 200.0));
        let placer = Placer::new(scene.view(), PlacerConfig::default());
        let found = placer.find_reachable_candidates(p(50.0, 50.0), 10, &TokenSet::new());
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn iteration_ceiling_caps_the_search() {
        let scene = GridScene::new(100.0, 20, 20).with_occupant(
            TokenId(1),
            p(500.0, 500.0),
            Footprint::new(10.0, 10.0),
        );
        let config = PlacerConfig {
            min_iterations: 5,
            iterations_per_candidate: 1,
            ..Default::default()
        };
        let placer = Placer::new(scene.view(), config);
        // Origin sits deep inside a 10×10 occupant: five iterations never
        // leave it, so nothing free is found.
        let found = placer.find_reachable_candidates(p(950.0, 950.0), 2, &TokenSet::new());
        assert!(found.is_empty());
    }

    proptest! {
        #[test]
        fn candidates_never_overlap_occupants(
            occupied in proptest::collection::vec((0i32..10, 0i32..10), 0..30),
            desired in 1usize..40,
        ) {
            let mut scene = GridScene::new(100.0, 10, 10);
            for (n, (x, y)) in occupied.iter().enumerate() {
                scene = scene.with_occupant(
                    TokenId(n as u64 + 1),
                    p(f64::from(*x) * 100.0, f64::from(*y) * 100.0),
                    Footprint::UNIT,
                );
            }
            let placer = Placer::new(scene.view(), PlacerConfig::default());
            let found = placer.find_reachable_candidates(p(450.0, 450.0), desired, &TokenSet::new());
            prop_assert!(found.len() <= desired);
            for c in &found {
                let cell = (c.top_left.x as i32 / 100, c.top_left.y as i32 / 100);
                prop_assert!(!occupied.contains(&cell), "candidate {:?} is occupied", cell);
            }
            let keys: HashSet<CellKey> = found.iter().map(Candidate::key).collect();
            prop_assert_eq!(keys.len(), found.len());
        }
    }
}
