//! Collaborator traits through which the core reaches the host.
//!
//! The core never reads ambient globals: every operation receives a
//! [`SceneView`] bundling the grid, wall and occupant collaborators, and
//! mutating operations additionally receive an [`AgentLifecycle`] and a
//! [`RosterStore`]. Tests substitute synthetic scenes.

use crate::error::ProviderError;
use crate::geom::{Footprint, Point, Rect};
use crate::id::{ActorId, TokenId, TokenSet};
use crate::roster::{Presentation, Roster, SimAttributes};

/// Square grid geometry of the host scene.
pub trait SceneGrid {
    /// Side length of one cell in world units.
    fn cell_size(&self) -> f64;

    /// Rectangle enclosing every placeable cell.
    fn bounds(&self) -> Rect;

    /// Top-left corner of the cell nearest to `p`.
    fn snap_top_left(&self, p: Point) -> Point;

    /// Center of the cell containing `p`.
    fn snap_center(&self, p: Point) -> Point;
}

/// Wall collision oracle.
pub trait Obstruction {
    /// Whether straight-line motion from `from` to `to` crosses a barrier.
    fn blocks(&self, from: Point, to: Point) -> bool;
}

/// A token currently placed in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Occupant {
    /// The placed token.
    pub token: TokenId,
    /// World position of its top-left corner.
    pub top_left: Point,
    /// Size in grid units.
    pub footprint: Footprint,
}

impl Occupant {
    /// World rectangle covered at `cell_size`.
    pub fn rect(&self, cell_size: f64) -> Rect {
        self.footprint.rect_at(self.top_left, cell_size)
    }

    /// World center at `cell_size`.
    pub fn center(&self, cell_size: f64) -> Point {
        self.footprint.center_at(self.top_left, cell_size)
    }
}

/// Enumerates placed tokens for occupancy testing.
pub trait OccupantRegistry {
    /// All placed tokens except those in `exclude`.
    fn occupants(&self, exclude: &TokenSet) -> Vec<Occupant>;

    /// Look up one placed token.
    fn locate(&self, token: TokenId) -> Option<Occupant>;
}

/// Read-only view of the host scene handed to spatial operations.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    /// Grid geometry.
    pub grid: &'a dyn SceneGrid,
    /// Wall oracle.
    pub walls: &'a dyn Obstruction,
    /// Occupant enumeration.
    pub occupants: &'a dyn OccupantRegistry,
}

impl<'a> SceneView<'a> {
    /// Bundle the three read-side collaborators.
    pub fn new(
        grid: &'a dyn SceneGrid,
        walls: &'a dyn Obstruction,
        occupants: &'a dyn OccupantRegistry,
    ) -> Self {
        Self {
            grid,
            walls,
            occupants,
        }
    }

    /// Shorthand for `grid.cell_size()`.
    pub fn cell_size(&self) -> f64 {
        self.grid.cell_size()
    }
}

/// Everything the host needs to create a token.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentDescriptor {
    /// Underlying entity.
    pub actor: ActorId,
    /// Visual properties.
    pub presentation: Presentation,
    /// Simulation attributes.
    pub attributes: SimAttributes,
    /// Initial top-left position.
    pub top_left: Point,
    /// The token this descriptor recreates, if any.
    pub restores: Option<TokenId>,
    /// Whether the new token stands in for a merged group.
    pub surrogate: bool,
}

/// Creates, moves and deletes tokens in the host scene.
pub trait AgentLifecycle {
    /// Create a token and return its id.
    fn create(&mut self, descriptor: &AgentDescriptor) -> Result<TokenId, ProviderError>;

    /// Move an existing token; hosts may animate the change.
    fn move_to(&mut self, token: TokenId, top_left: Point) -> Result<(), ProviderError>;

    /// Delete a token.
    fn delete(&mut self, token: TokenId) -> Result<(), ProviderError>;
}

/// Persists the roster and busy marker for each surrogate.
pub trait RosterStore {
    /// Read the roster behind `surrogate`, or `None` if it is not a surrogate.
    fn load(&self, surrogate: TokenId) -> Result<Option<Roster>, ProviderError>;

    /// Write (create or replace) the roster behind `surrogate`.
    fn save(&mut self, surrogate: TokenId, roster: &Roster) -> Result<(), ProviderError>;

    /// Forget the roster and busy marker behind `surrogate`.
    fn remove(&mut self, surrogate: TokenId) -> Result<(), ProviderError>;

    /// Whether a dispersal of `surrogate` is marked in progress.
    fn is_busy(&self, surrogate: TokenId) -> Result<bool, ProviderError>;

    /// Set or clear the in-progress marker.
    fn set_busy(&mut self, surrogate: TokenId, busy: bool) -> Result<(), ProviderError>;
}
