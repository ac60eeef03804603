//! Resolver tuning.

use std::error::Error;
use std::fmt;

/// Padding for the fallback candidate searches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Extra candidates requested by the first fallback search, on top of
    /// `unresolved + claimed`. Default: 2.
    pub fallback_padding: usize,
    /// Further candidates requested by the emergency search, on top of the
    /// first fallback request. Default: 4.
    pub emergency_padding: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_padding: 2,
            emergency_padding: 4,
        }
    }
}

impl ResolverConfig {
    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ResolverConfigError> {
        if self.emergency_padding == 0 {
            return Err(ResolverConfigError::ZeroEmergencyPadding);
        }
        Ok(())
    }
}

/// Errors detected during [`ResolverConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverConfigError {
    /// `emergency_padding` is zero, so the emergency search could never
    /// look further than the fallback one.
    ZeroEmergencyPadding,
}

impl fmt::Display for ResolverConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroEmergencyPadding => write!(f, "emergency_padding must be at least 1"),
        }
    }
}

impl Error for ResolverConfigError {}
