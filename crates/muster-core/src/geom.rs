//! World-space and grid-space geometry primitives.
//!
//! Two coordinate systems meet here. World space is the host scene's
//! continuous plane (`Point`, `Rect`), with `y` growing downward. Grid
//! space counts whole cells relative to a group's anchor (`GridOffset`).

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Largest absolute coordinate a remembered grid offset may hold.
///
/// The arrangement grid is the 5×5 square `-2..=2` on both axes.
pub const OFFSET_LIMIT: i32 = 2;

/// A point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Offset this point by whole cells of `cell_size`.
    pub fn offset_by(self, offset: GridOffset, cell_size: f64) -> Point {
        Point::new(
            self.x + f64::from(offset.dx) * cell_size,
            self.y + f64::from(offset.dy) * cell_size,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A relative position in whole grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridOffset {
    /// Columns to the right of the anchor (negative: left).
    pub dx: i32,
    /// Rows below the anchor (negative: above).
    pub dy: i32,
}

impl GridOffset {
    /// The anchor's own slot.
    pub const ORIGIN: GridOffset = GridOffset { dx: 0, dy: 0 };

    /// Construct an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Round a fractional cell offset to the nearest whole cell.
    ///
    /// Halves round away from zero.
    pub fn round(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    /// Clamp both axes into the arrangement grid `-2..=2`.
    pub fn clamped(self) -> Self {
        Self::new(
            self.dx.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
            self.dy.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
        )
    }

    /// Whether both axes already lie within the arrangement grid.
    pub fn in_arrangement_grid(self) -> bool {
        self.clamped() == self
    }

    /// Chebyshev (L-inf) length: the ring this offset lies on.
    pub fn chebyshev(self) -> i32 {
        self.dx.abs().max(self.dy.abs())
    }

    /// Whether this is the anchor's own slot.
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

impl Add for GridOffset {
    type Output = GridOffset;

    fn add(self, rhs: GridOffset) -> GridOffset {
        GridOffset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl fmt::Display for GridOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.dx, self.dy)
    }
}

/// Hashable key for a grid cell: its center rounded to whole world units.
///
/// Two centers within half a unit of each other map to the same key,
/// which absorbs floating-point drift from repeated snapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(pub i64, pub i64);

impl CellKey {
    /// Key for the cell whose center is `center`.
    pub fn from_center(center: Point) -> Self {
        Self(center.x.round() as i64, center.y.round() as i64)
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (non-negative).
    pub width: f64,
    /// Height (non-negative).
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `p` lies inside or on the boundary.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Shrink every edge inward by `margin`.
    ///
    /// A margin larger than half a side collapses that side to zero width
    /// around the rectangle's center.
    pub fn inset(&self, margin: f64) -> Rect {
        let mx = margin.min(self.width / 2.0);
        let my = margin.min(self.height / 2.0);
        Rect::new(
            self.x + mx,
            self.y + my,
            self.width - 2.0 * mx,
            self.height - 2.0 * my,
        )
    }

    /// Strict overlap test: rectangles that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Size of a token in grid units (1×1 is one cell).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Width in cells.
    pub width: f64,
    /// Height in cells.
    pub height: f64,
}

impl Footprint {
    /// A single cell.
    pub const UNIT: Footprint = Footprint {
        width: 1.0,
        height: 1.0,
    };

    /// Construct a footprint.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// World-space rectangle covered by this footprint at `top_left`.
    pub fn rect_at(&self, top_left: Point, cell_size: f64) -> Rect {
        Rect::new(
            top_left.x,
            top_left.y,
            self.width * cell_size,
            self.height * cell_size,
        )
    }

    /// World-space center of this footprint placed at `top_left`.
    pub fn center_at(&self, top_left: Point, cell_size: f64) -> Point {
        self.rect_at(top_left, cell_size).center()
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::UNIT
    }
}
