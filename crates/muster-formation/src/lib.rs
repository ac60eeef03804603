//! Formation geometry for Muster.
//!
//! Built-in patterns are pure functions of participant count and facing
//! ([`generate`]). User patterns are fixed slot lists captured from a
//! group and kept in a [`FormationLibrary`]; [`bind_slots`] re-seats a
//! roster into a saved pattern, preferring the same token, then the same
//! underlying actor, for each slot.
//!
//! All offsets are in whole cells relative to rank 0's anchor, with `y`
//! growing toward the rear when facing north.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod binding;
pub mod custom;
pub mod error;
pub mod library;
pub mod pattern;
pub mod rotate;
pub mod store;

pub use binding::{apply_bindings, bind_slots, spiral_free, Binding, SlotMatch};
pub use custom::{CustomPattern, PatternSlot};
pub use error::FormationError;
pub use library::{FormationDefinition, FormationLibrary, PatternSummary};
pub use muster_core::FormationKind;
pub use pattern::{generate, SlotOffset};
pub use rotate::{nearest_free, rotate_offset, rotate_offsets, rotate_point};
pub use store::{MemoryPatternStore, PatternStore};
