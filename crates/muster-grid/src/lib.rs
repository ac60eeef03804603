//! Grid reachability for Muster.
//!
//! This crate answers two questions about the cells around a point:
//! which free cells are nearest by walking distance
//! ([`Placer::find_reachable_candidates`]), and which cells can be reached
//! at all without crossing a wall ([`Placer::build_reachable_set`]).
//!
//! # Movement model
//!
//! Cells form an 8-connected lattice anchored on the origin's cell. Every
//! step is validated on its own with a three-probe wall test
//! ([`probe::step_blocked`]); a diagonal step additionally needs one of
//! its two orthogonal legs to be open, so paths never squeeze through the
//! corner where two walls meet.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod occupancy;
pub mod placer;
pub mod probe;
pub mod reachable;

pub use config::{PlacerConfig, PlacerConfigError};
pub use occupancy::OccupancyMap;
pub use placer::{Candidate, FloodEnd, Placer};
pub use reachable::ReachableSet;
