//! A synthetic square-grid scene with wall segments and occupants.

use muster_core::{
    Footprint, Obstruction, Occupant, OccupantRegistry, Point, Rect, SceneGrid, SceneView,
    TokenId, TokenSet,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// Occupant list shared between a [`GridScene`] and its lifecycle mock.
pub type SharedOccupants = Arc<Mutex<Vec<Occupant>>>;

/// A `cols × rows` grid of square cells starting at the world origin.
///
/// Walls are straight segments; a move is blocked if its segment touches
/// any wall, endpoints included.
#[derive(Clone, Debug)]
pub struct GridScene {
    cell_size: f64,
    bounds: Rect,
    walls: Vec<(Point, Point)>,
    occupants: SharedOccupants,
}

impl GridScene {
    pub fn new(cell_size: f64, cols: u32, rows: u32) -> Self {
        Self {
            cell_size,
            bounds: Rect::new(
                0.0,
                0.0,
                f64::from(cols) * cell_size,
                f64::from(rows) * cell_size,
            ),
            walls: Vec::new(),
            occupants: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a wall segment between two world points.
    pub fn with_wall(mut self, a: (f64, f64), b: (f64, f64)) -> Self {
        self.walls.push((Point::new(a.0, a.1), Point::new(b.0, b.1)));
        self
    }

    /// Add a closed rectangle of walls around the given cells.
    pub fn with_walled_box(self, col: i32, row: i32, cols: i32, rows: i32) -> Self {
        let cs = self.cell_size;
        let (x0, y0) = (f64::from(col) * cs, f64::from(row) * cs);
        let (x1, y1) = (x0 + f64::from(cols) * cs, y0 + f64::from(rows) * cs);
        self.with_wall((x0, y0), (x1, y0))
            .with_wall((x1, y0), (x1, y1))
            .with_wall((x1, y1), (x0, y1))
            .with_wall((x0, y1), (x0, y0))
    }

    /// Place a token.
    pub fn with_occupant(self, token: TokenId, top_left: Point, footprint: Footprint) -> Self {
        self.lock().push(Occupant {
            token,
            top_left,
            footprint,
        });
        self
    }

    /// Borrow the scene as the core's read-side view.
    pub fn view(&self) -> SceneView<'_> {
        SceneView::new(self, self, self)
    }

    /// The shared occupant list, for wiring up a lifecycle mock.
    pub fn shared_occupants(&self) -> SharedOccupants {
        Arc::clone(&self.occupants)
    }

    /// Top-left corner of cell `(col, row)`.
    pub fn cell(&self, col: i32, row: i32) -> Point {
        Point::new(f64::from(col) * self.cell_size, f64::from(row) * self.cell_size)
    }

    /// Center of cell `(col, row)`.
    pub fn cell_center(&self, col: i32, row: i32) -> Point {
        let half = self.cell_size / 2.0;
        let tl = self.cell(col, row);
        Point::new(tl.x + half, tl.y + half)
    }

    /// `(col, row)` of the cell whose top-left corner is `top_left`.
    pub fn cell_of(&self, top_left: Point) -> (i32, i32) {
        (
            (top_left.x / self.cell_size).round() as i32,
            (top_left.y / self.cell_size).round() as i32,
        )
    }

    /// Snapshot of every placed token.
    pub fn all_occupants(&self) -> Vec<Occupant> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Occupant>> {
        self.occupants.lock().expect("occupant list poisoned")
    }
}

impl SceneGrid for GridScene {
    fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn snap_top_left(&self, p: Point) -> Point {
        let cs = self.cell_size;
        Point::new((p.x / cs).round() * cs, (p.y / cs).round() * cs)
    }

    fn snap_center(&self, p: Point) -> Point {
        let cs = self.cell_size;
        Point::new(
            (p.x / cs).floor() * cs + cs / 2.0,
            (p.y / cs).floor() * cs + cs / 2.0,
        )
    }
}

impl Obstruction for GridScene {
    fn blocks(&self, from: Point, to: Point) -> bool {
        self.walls
            .iter()
            .any(|&(a, b)| segments_intersect(from, to, a, b))
    }
}

impl OccupantRegistry for GridScene {
    fn occupants(&self, exclude: &TokenSet) -> Vec<Occupant> {
        self.lock()
            .iter()
            .filter(|o| !exclude.contains(&o.token))
            .cloned()
            .collect()
    }

    fn locate(&self, token: TokenId) -> Option<Occupant> {
        self.lock().iter().find(|o| o.token == token).cloned()
    }
}

/// Closed segment intersection: touching endpoints and collinear overlap
/// both count.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
    fn on_segment(a: Point, b: Point, c: Point) -> bool {
        c.x >= a.x.min(b.x) - 1e-9
            && c.x <= a.x.max(b.x) + 1e-9
            && c.y >= a.y.min(b.y) - 1e-9
            && c.y <= a.y.max(b.y) + 1e-9
    }
    let sign = |v: f64| {
        if v.abs() < 1e-9 {
            0
        } else if v > 0.0 {
            1
        } else {
            -1
        }
    };
    let d1 = sign(orient(q1, q2, p1));
    let d2 = sign(orient(q1, q2, p2));
    let d3 = sign(orient(p1, p2, q1));
    let d4 = sign(orient(p1, p2, q2));
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(q1, q2, p1))
        || (d2 == 0 && on_segment(q1, q2, p2))
        || (d3 == 0 && on_segment(p1, p2, q1))
        || (d4 == 0 && on_segment(p1, p2, q2))
}
