//! Muster: gather agents on a square grid into one group token and
//! disperse them again, keeping their arrangement.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Muster sub-crates. For most users, adding `muster` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use muster::prelude::*;
//! use muster_test_utils::{GridScene, MemoryRosterStore, RecordingLifecycle};
//!
//! let scene = GridScene::new(100.0, 11, 11);
//! let mut life = RecordingLifecycle::new(scene.shared_occupants());
//! let mut store = MemoryRosterStore::new();
//!
//! // Two agents standing either side of cell (5, 5).
//! let agents: Vec<LiveAgent> = [(1, 4), (2, 6)]
//!     .into_iter()
//!     .map(|(id, col)| {
//!         let top_left = scene.cell(col, 5);
//!         scene.shared_occupants().lock().unwrap().push(Occupant {
//!             token: TokenId(id),
//!             top_left,
//!             footprint: Footprint::UNIT,
//!         });
//!         LiveAgent::new(TokenId(id), ActorId(id), top_left)
//!     })
//!     .collect();
//!
//! let mut party = Party::new(PartyConfig::default()).unwrap();
//! let gathered = party
//!     .gather(&mut Host::new(scene.view(), &mut life, &mut store), &agents, None)
//!     .unwrap();
//! assert_eq!(gathered.roster.len(), 2);
//!
//! let out = party
//!     .disperse(
//!         &mut Host::new(scene.view(), &mut life, &mut store),
//!         gathered.surrogate,
//!         &DisperseOptions::default(),
//!     )
//!     .unwrap();
//! assert_eq!(out.resolution.count(PlacementTier::Memory), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `muster-core` | IDs, geometry, rosters, collaborator traits |
//! | [`grid`] | `muster-grid` | Flood-fill placement and reachability |
//! | [`formation`] | `muster-formation` | Built-in formations, rotation, saved patterns |
//! | [`assign`] | `muster-assign` | Member-to-cell resolution with fallback tiers |
//! | [`party`] | `muster-party` | Gather, disperse, scatter and membership edits |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`muster-core`).
///
/// Contains geometry, [`types::Roster`], error types, and the
/// collaborator traits ([`types::SceneGrid`], [`types::AgentLifecycle`],
/// [`types::RosterStore`]).
pub use muster_core as types;

/// Flood-fill placement (`muster-grid`).
///
/// [`grid::Placer`] finds the nearest free cells by walking distance and
/// builds the [`grid::ReachableSet`] used to validate remembered offsets.
pub use muster_grid as grid;

/// Formation geometry and the pattern library (`muster-formation`).
pub use muster_formation as formation;

/// Placement resolution (`muster-assign`).
///
/// The [`assign::Resolver`] turns a roster into one
/// [`assign::Placement`] per member.
pub use muster_assign as assign;

/// Group orchestration (`muster-party`).
pub use muster_party as party;

/// Common imports for typical Muster usage.
///
/// ```rust
/// use muster::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use muster_core::{
        ActorId, AgentLifecycle, AgentSnapshot, Footprint, FormationKind, GridOffset, Obstruction,
        Occupant, OccupantRegistry, Point, Roster, RosterStore, SceneGrid, SceneView, TokenId,
    };

    // Errors
    pub use muster_core::{ProviderError, RosterError};
    pub use muster_formation::FormationError;
    pub use muster_party::{PartyError, PartyWarning};

    // Placement
    pub use muster_assign::{PlacementTier, ResolveMode, Resolution};
    pub use muster_grid::{Placer, PlacerConfig};

    // Formations
    pub use muster_formation::{
        CustomPattern, FormationLibrary, MemoryPatternStore, PatternSlot, PatternStore,
    };

    // Orchestration
    pub use muster_party::{
        DisperseOptions, DisperseOutcome, GatherOutcome, GroupPhase, Host, LiveAgent, Party,
        PartyConfig, RemoveOutcome,
    };
}
