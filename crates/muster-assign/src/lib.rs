//! Placement assignment for Muster.
//!
//! A [`Resolver`] turns a roster plus an anchor into one concrete cell per
//! member. It works in two passes: every member first gets a proposed
//! [`PositionSource`] (a remembered offset, a saved-pattern slot, or a
//! reachable candidate), then each source is located and validated against
//! the reachable set and the cells already claimed. Members that fail fall
//! through the fallback tiers of [`PlacementTier`].
//!
//! The resolver never mutates anything; callers inspect the returned
//! [`Resolution`] and decide whether to apply it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod resolution;
pub mod resolver;
pub mod source;

pub use config::{ResolverConfig, ResolverConfigError};
pub use resolution::{Placement, PlacementTier, ResolveMode, Resolution};
pub use resolver::{ResolveRequest, Resolver};
pub use source::{rotate_sources, PositionSource};
