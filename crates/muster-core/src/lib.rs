//! Core types and traits for Muster token placement.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Muster workspace:
//! identities, grid geometry, the roster of merged agents, collaborator
//! traits through which the core reaches the host scene, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geom;
pub mod id;
pub mod roster;
pub mod traits;

pub use error::{ProviderError, RosterError};
pub use geom::{CellKey, Footprint, GridOffset, Point, Rect, OFFSET_LIMIT};
pub use id::{ActorId, TokenId, TokenSet};
pub use roster::{
    AgentSnapshot, Disposition, FormationKind, LightSource, Presentation, Rank, Role, Roster,
    SimAttributes, Vision,
};
pub use traits::{
    AgentDescriptor, AgentLifecycle, Obstruction, Occupant, OccupantRegistry, RosterStore,
    SceneGrid, SceneView,
};
