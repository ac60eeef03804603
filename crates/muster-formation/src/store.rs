//! Persistence seam for saved patterns.

use crate::custom::CustomPattern;
use indexmap::IndexMap;
use muster_core::ProviderError;

/// Reads and writes the full set of saved patterns.
///
/// The library always writes the whole set; stores need no partial
/// update support.
pub trait PatternStore {
    /// Load every saved pattern, keyed by name.
    fn load_patterns(&self) -> Result<IndexMap<String, CustomPattern>, ProviderError>;

    /// Replace the saved set.
    fn store_patterns(
        &mut self,
        patterns: &IndexMap<String, CustomPattern>,
    ) -> Result<(), ProviderError>;
}

/// In-memory pattern store.
#[derive(Clone, Debug, Default)]
pub struct MemoryPatternStore {
    patterns: IndexMap<String, CustomPattern>,
    read_only: bool,
}

impl MemoryPatternStore {
    /// An empty, writable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every subsequent write.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of saved patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl PatternStore for MemoryPatternStore {
    fn load_patterns(&self) -> Result<IndexMap<String, CustomPattern>, ProviderError> {
        Ok(self.patterns.clone())
    }

    fn store_patterns(
        &mut self,
        patterns: &IndexMap<String, CustomPattern>,
    ) -> Result<(), ProviderError> {
        if self.read_only {
            return Err(ProviderError::Storage {
                reason: "pattern store is read-only".into(),
            });
        }
        self.patterns = patterns.clone();
        Ok(())
    }
}
