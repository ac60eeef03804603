//! Gather and disperse orchestration for Muster.
//!
//! A [`Party`] merges a set of live agents into one surrogate token
//! ([`Party::gather`]) and later splits it back out ([`Party::disperse`],
//! [`Party::emergency_scatter`]). Members can join and leave an active
//! group, and the arrangement they return to can be edited in between.
//!
//! Every destructive step is ordered so the scene is never left without
//! either the surrogate or its members: replacements are created before
//! the surrogate is deleted, and a dispersal that would stack more than
//! half the group on one cell is refused before anything changes. A
//! [`BusyLease`] marks a group as in-flight for the duration of each
//! destructive operation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod lease;
pub mod outcome;
pub mod phase;

mod dispersal;
mod gather;
mod members;
mod party;

pub use config::{ConfigError, PartyConfig};
pub use error::{PartyError, PartyWarning};
pub use host::{Host, LiveAgent};
pub use lease::BusyLease;
pub use outcome::{DisperseOptions, DisperseOutcome, GatherOutcome, RemoveOutcome};
pub use party::Party;
pub use phase::GroupPhase;
