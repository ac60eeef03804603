//! Occupancy testing against placed tokens.

use muster_core::{Point, Rect, SceneView, TokenSet};

/// Snapshot of occupied rectangles, shrunk by the overlap margin.
///
/// Captured once per search so the registry is enumerated once rather
/// than once per visited cell.
#[derive(Clone, Debug)]
pub struct OccupancyMap {
    rects: Vec<Rect>,
    margin: f64,
    cell_size: f64,
}

impl OccupancyMap {
    /// Capture every occupant except `exclude`.
    ///
    /// `margin` is in world units and is applied inward to both sides of
    /// each test, so footprints that merely touch never collide.
    pub fn capture(scene: &SceneView<'_>, exclude: &TokenSet, margin: f64) -> Self {
        let cell_size = scene.cell_size();
        let rects = scene
            .occupants
            .occupants(exclude)
            .iter()
            .map(|o| o.rect(cell_size).inset(margin))
            .collect();
        Self {
            rects,
            margin,
            cell_size,
        }
    }

    /// Whether a one-cell footprint at `top_left` overlaps no occupant.
    pub fn is_free(&self, top_left: Point) -> bool {
        let probe = Rect::new(top_left.x, top_left.y, self.cell_size, self.cell_size)
            .inset(self.margin);
        !self.rects.iter().any(|r| r.overlaps(&probe))
    }

    /// Number of captured occupants.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether no occupant was captured.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_core::{Footprint, TokenId};
    use muster_test_utils::GridScene;

    #[test]
    fn adjacent_tokens_do_not_collide() {
        let scene = GridScene::new(100.0, 10, 10).with_occupant(
            TokenId(1),
            Point::new(200.0, 200.0),
            Footprint::UNIT,
        );
        let map = OccupancyMap::capture(&scene.view(), &TokenSet::new(), 10.0);
        assert_eq!(map.len(), 1);
        assert!(!map.is_free(Point::new(200.0, 200.0)));
        assert!(map.is_free(Point::new(300.0, 200.0)));
        assert!(map.is_free(Point::new(100.0, 100.0)));
    }

    #[test]
    fn large_footprint_covers_several_cells() {
        let scene = GridScene::new(100.0, 10, 10).with_occupant(
            TokenId(1),
            Point::new(200.0, 200.0),
            Footprint::new(2.0, 2.0),
        );
        let map = OccupancyMap::capture(&scene.view(), &TokenSet::new(), 10.0);
        for (x, y) in [(200.0, 200.0), (300.0, 200.0), (200.0, 300.0), (300.0, 300.0)] {
            assert!(!map.is_free(Point::new(x, y)), "({x}, {y}) should be occupied");
        }
        assert!(map.is_free(Point::new(400.0, 300.0)));
    }

    #[test]
    fn excluded_tokens_are_ignored() {
        let scene = GridScene::new(100.0, 10, 10).with_occupant(
            TokenId(1),
            Point::new(200.0, 200.0),
            Footprint::UNIT,
        );
        let exclude: TokenSet = [TokenId(1)].into_iter().collect();
        let map = OccupancyMap::capture(&scene.view(), &exclude, 10.0);
        assert!(map.is_empty());
        assert!(map.is_free(Point::new(200.0, 200.0)));
    }
}
