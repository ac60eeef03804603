//! Flood-fill tuning.

use std::error::Error;
use std::fmt;

/// Tuning for [`Placer`](crate::Placer).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacerConfig {
    /// Perpendicular offset of the two side probes, as a fraction of the
    /// cell size. Default: 0.35.
    pub probe_spread: f64,
    /// Floor on flood-fill iterations per search. Default: 2000.
    pub min_iterations: usize,
    /// Iterations allowed per requested candidate. The ceiling for a
    /// search is `max(min_iterations, desired * iterations_per_candidate)`.
    /// Default: 500.
    pub iterations_per_candidate: usize,
    /// Inward margin applied to both rectangles before an occupancy
    /// overlap test, as a fraction of the cell size. Default: 0.1.
    pub overlap_margin: f64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            probe_spread: 0.35,
            min_iterations: 2000,
            iterations_per_candidate: 500,
            overlap_margin: 0.1,
        }
    }
}

impl PlacerConfig {
    /// Iteration ceiling for a search asking for `desired` candidates.
    pub fn iteration_ceiling(&self, desired: usize) -> usize {
        self.min_iterations
            .max(desired.saturating_mul(self.iterations_per_candidate))
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), PlacerConfigError> {
        if !self.probe_spread.is_finite() || !(0.0..0.5).contains(&self.probe_spread) {
            return Err(PlacerConfigError::ProbeSpreadOutOfRange {
                value: self.probe_spread,
            });
        }
        if !self.overlap_margin.is_finite() || !(0.0..0.5).contains(&self.overlap_margin) {
            return Err(PlacerConfigError::OverlapMarginOutOfRange {
                value: self.overlap_margin,
            });
        }
        if self.min_iterations == 0 {
            return Err(PlacerConfigError::ZeroIterationFloor);
        }
        if self.iterations_per_candidate == 0 {
            return Err(PlacerConfigError::ZeroIterationsPerCandidate);
        }
        Ok(())
    }
}

/// Errors detected during [`PlacerConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlacerConfigError {
    /// `probe_spread` is not in `[0, 0.5)`.
    ProbeSpreadOutOfRange {
        /// The configured value.
        value: f64,
    },
    /// `overlap_margin` is not in `[0, 0.5)`.
    OverlapMarginOutOfRange {
        /// The configured value.
        value: f64,
    },
    /// `min_iterations` is zero.
    ZeroIterationFloor,
    /// `iterations_per_candidate` is zero.
    ZeroIterationsPerCandidate,
}

impl fmt::Display for PlacerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeSpreadOutOfRange { value } => {
                write!(f, "probe_spread must be in [0, 0.5), got {value}")
            }
            Self::OverlapMarginOutOfRange { value } => {
                write!(f, "overlap_margin must be in [0, 0.5), got {value}")
            }
            Self::ZeroIterationFloor => write!(f, "min_iterations must be at least 1"),
            Self::ZeroIterationsPerCandidate => {
                write!(f, "iterations_per_candidate must be at least 1")
            }
        }
    }
}

impl Error for PlacerConfigError {}
