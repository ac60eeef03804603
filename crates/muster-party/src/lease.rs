//! Scoped ownership of a group's busy flag.

use muster_core::{ProviderError, RosterStore, TokenId};
use tracing::warn;

/// Holds a group's busy flag for the duration of a destructive operation.
///
/// Acquiring sets the flag; dropping clears it on every exit path. A flag
/// already set on entry is taken as the trace of an attempt that died
/// mid-way: it is logged, reported through [`BusyLease::recovered`], and
/// taken over rather than waited on, so a stuck flag can never wedge the
/// group.
pub struct BusyLease<'s, S: RosterStore + ?Sized> {
    store: &'s mut S,
    surrogate: TokenId,
    recovered: bool,
}

impl<'s, S: RosterStore + ?Sized> BusyLease<'s, S> {
    /// Take the flag for `surrogate`.
    pub fn acquire(store: &'s mut S, surrogate: TokenId) -> Result<Self, ProviderError> {
        let recovered = store.is_busy(surrogate)?;
        if recovered {
            warn!(surrogate = %surrogate, "busy flag already set, recovering from an interrupted operation");
        }
        store.set_busy(surrogate, true)?;
        Ok(Self {
            store,
            surrogate,
            recovered,
        })
    }

    /// Whether a stale flag was found on entry.
    pub fn recovered(&self) -> bool {
        self.recovered
    }

    /// The group this lease covers.
    pub fn surrogate(&self) -> TokenId {
        self.surrogate
    }

    /// The store, for use while the lease is held.
    pub fn store(&mut self) -> &mut S {
        self.store
    }
}

impl<S: RosterStore + ?Sized> Drop for BusyLease<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.store.set_busy(self.surrogate, false) {
            warn!(surrogate = %self.surrogate, error = %e, "could not clear busy flag");
        }
    }
}
