//! Test utilities and mock collaborators for Muster development.
//!
//! Provides a synthetic square-grid scene ([`GridScene`]) implementing the
//! read-side collaborator traits, plus a [`RecordingLifecycle`] and a
//! [`MemoryRosterStore`] for the mutating side. The scene and the
//! lifecycle share one occupant list, so tokens the core creates show up
//! in later occupancy queries.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod lifecycle;
pub mod scene;
pub mod store;

pub use lifecycle::{LifecycleEvent, RecordingLifecycle};
pub use scene::{segments_intersect, GridScene, SharedOccupants};
pub use store::MemoryRosterStore;
