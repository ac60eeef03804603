//! Strongly-typed identifiers for placed tokens and their underlying actors.

use indexmap::IndexSet;
use std::fmt;

/// Identifies a placed token in the host scene.
///
/// Opaque to the core: the host allocates token ids and the core only
/// compares and stores them. A recreated agent receives a fresh `TokenId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token:{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies the underlying entity a token represents.
///
/// Several tokens may share one actor (e.g. unlinked copies), so the
/// actor id is the secondary key when re-seating agents into saved slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Insertion-ordered set of tokens, used for occupancy exclusion lists.
pub type TokenSet = IndexSet<TokenId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed() {
        assert_eq!(TokenId(7).to_string(), "token:7");
        assert_eq!(ActorId(3).to_string(), "actor:3");
    }

    #[test]
    fn token_set_keeps_insertion_order() {
        let set: TokenSet = [TokenId(9), TokenId(2), TokenId(9)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_index(0), Some(&TokenId(9)));
    }
}
