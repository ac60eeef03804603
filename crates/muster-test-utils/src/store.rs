//! In-memory roster persistence.

use indexmap::{IndexMap, IndexSet};
use muster_core::{ProviderError, Roster, RosterStore, TokenId};

/// Roster store backed by a map, with an optional scripted save failure.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    rosters: IndexMap<TokenId, Roster>,
    busy: IndexSet<TokenId>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail with a storage error.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Number of stored rosters.
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    /// Raw roster access, bypassing the trait.
    pub fn get(&self, surrogate: TokenId) -> Option<&Roster> {
        self.rosters.get(&surrogate)
    }

    /// Raw busy flag access, bypassing the trait.
    pub fn busy(&self, surrogate: TokenId) -> bool {
        self.busy.contains(&surrogate)
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self, surrogate: TokenId) -> Result<Option<Roster>, ProviderError> {
        Ok(self.rosters.get(&surrogate).cloned())
    }

    fn save(&mut self, surrogate: TokenId, roster: &Roster) -> Result<(), ProviderError> {
        if self.fail_saves {
            return Err(ProviderError::Storage {
                reason: "store is read-only".into(),
            });
        }
        self.rosters.insert(surrogate, roster.clone());
        self.saves += 1;
        Ok(())
    }

    fn remove(&mut self, surrogate: TokenId) -> Result<(), ProviderError> {
        self.rosters.shift_remove(&surrogate);
        self.busy.shift_remove(&surrogate);
        Ok(())
    }

    fn is_busy(&self, surrogate: TokenId) -> Result<bool, ProviderError> {
        Ok(self.busy.contains(&surrogate))
    }

    fn set_busy(&mut self, surrogate: TokenId, busy: bool) -> Result<(), ProviderError> {
        if busy {
            if !self.rosters.contains_key(&surrogate) {
                return Err(ProviderError::NotFound { token: surrogate });
            }
            self.busy.insert(surrogate);
        } else {
            self.busy.shift_remove(&surrogate);
        }
        Ok(())
    }
}
