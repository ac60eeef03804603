//! Orchestrator configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use muster_assign::{ResolverConfig, ResolverConfigError};
use muster_core::FormationKind;
use muster_grid::{PlacerConfig, PlacerConfigError};

// ── PartyConfig ────────────────────────────────────────────────────

/// Configuration for a [`Party`](crate::Party).
#[derive(Clone, Debug)]
pub struct PartyConfig {
    /// Flood-fill tuning.
    pub placer: PlacerConfig,
    /// Fallback search padding.
    pub resolver: ResolverConfig,
    /// Cells explored when building the reachable set. Default: 625
    /// (a 25×25 area).
    pub reachable_cell_budget: usize,
    /// Formation given to new groups. Default: line.
    pub default_formation: FormationKind,
    /// Smallest group worth a surrogate. Default: 2.
    pub min_members: usize,
    /// Create replacements on the surrogate's cell and then move them out,
    /// instead of creating them in place. Default: true.
    pub animate: bool,
    /// Seed for the scatter shuffle. Default: 0.
    pub scatter_seed: u64,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            placer: PlacerConfig::default(),
            resolver: ResolverConfig::default(),
            reachable_cell_budget: 625,
            default_formation: FormationKind::Line,
            min_members: 2,
            animate: true,
            scatter_seed: 0,
        }
    }
}

impl PartyConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.placer.validate().map_err(ConfigError::InvalidPlacer)?;
        self.resolver.validate().map_err(ConfigError::InvalidResolver)?;
        if self.reachable_cell_budget == 0 {
            return Err(ConfigError::ZeroCellBudget);
        }
        if self.min_members < 2 {
            return Err(ConfigError::MinMembersTooSmall {
                configured: self.min_members,
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`PartyConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Placer tuning is unusable.
    InvalidPlacer(PlacerConfigError),
    /// Resolver tuning is unusable.
    InvalidResolver(ResolverConfigError),
    /// `reachable_cell_budget` is zero.
    ZeroCellBudget,
    /// `min_members` is below 2.
    MinMembersTooSmall {
        /// The configured value.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlacer(e) => write!(f, "invalid placer config: {e}"),
            Self::InvalidResolver(e) => write!(f, "invalid resolver config: {e}"),
            Self::ZeroCellBudget => write!(f, "reachable_cell_budget must be at least 1"),
            Self::MinMembersTooSmall { configured } => {
                write!(f, "min_members must be at least 2, got {configured}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPlacer(e) => Some(e),
            Self::InvalidResolver(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(PartyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_singleton_groups() {
        let cfg = PartyConfig {
            min_members: 1,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MinMembersTooSmall { configured: 1 })
        );
    }

    #[test]
    fn rejects_zero_budget_and_bad_probes() {
        let cfg = PartyConfig {
            reachable_cell_budget: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCellBudget));

        let mut cfg = PartyConfig::default();
        cfg.placer.probe_spread = f64::INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPlacer(PlacerConfigError::ProbeSpreadOutOfRange { .. }))
        ));
    }

    #[test]
    fn nested_errors_keep_their_source() {
        let mut cfg = PartyConfig::default();
        cfg.resolver.emergency_padding = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidResolver(ResolverConfigError::ZeroEmergencyPadding)
        );
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("emergency_padding must be at least 1"));
        assert_eq!(
            err.to_string(),
            "invalid resolver config: emergency_padding must be at least 1"
        );
    }
}
