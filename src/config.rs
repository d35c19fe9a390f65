//! Tuning parameters supplied when a forest is created.
//!
//! The values are fixed for the lifetime of a [`Forest`](crate::core::Forest);
//! nothing is read from the environment.

use crate::error::ForestError;
use serde::{Deserialize, Serialize};

/// Default relative tolerance under which two weights count as similar (15%).
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.15;

/// Default minimum overlap ratio for clustering similarly weighted hyperedges.
pub const DEFAULT_MIN_OVERLAP_RATIO: f64 = 0.3;

/// Default absolute tolerance for weight comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Default descent depth after which insertion stops walking down a chain:
/// unbounded.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = usize::MAX;

/// Configuration of a forest's dominance policy and insertion heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Relative tolerance: `|a - b| < (|a| + |b|) / 2 * weight_tolerance` means similar.
    pub weight_tolerance: f64,
    /// Minimum `|A ∩ B| / min(|A|, |B|)` for two hyperedges to be clustered.
    pub min_overlap_ratio: f64,
    /// Absolute tolerance: weights closer than this are always similar.
    pub epsilon: f64,
    /// Depth (roots are depth 1) at which a descending candidate is attached
    /// to the current node instead of walking further down. Only doctrines
    /// that do not nest children honour it; see
    /// [`Doctrine::chain_depth_limit`](crate::doctrine::Doctrine::chain_depth_limit).
    pub max_chain_depth: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            min_overlap_ratio: DEFAULT_MIN_OVERLAP_RATIO,
            epsilon: DEFAULT_EPSILON,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }
}

impl ForestConfig {
    /// Sets the relative weight tolerance.
    pub fn with_weight_tolerance(mut self, tolerance: f64) -> Self {
        self.weight_tolerance = tolerance;
        self
    }

    /// Sets the minimum overlap ratio used for clustering.
    pub fn with_min_overlap_ratio(mut self, ratio: f64) -> Self {
        self.min_overlap_ratio = ratio;
        self
    }

    /// Sets the absolute weight tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the maximum descent depth.
    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    /// Checks that every parameter is in its meaningful range.
    pub fn validate(&self) -> Result<(), ForestError> {
        if !self.weight_tolerance.is_finite() || self.weight_tolerance < 0.0 {
            return Err(ForestError::invalid_config(format!(
                "weight_tolerance must be finite and non-negative, got {}",
                self.weight_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.min_overlap_ratio) {
            return Err(ForestError::invalid_config(format!(
                "min_overlap_ratio must lie in [0, 1], got {}",
                self.min_overlap_ratio
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ForestError::invalid_config(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        if self.max_chain_depth == 0 {
            return Err(ForestError::invalid_config("max_chain_depth must be at least 1"));
        }
        Ok(())
    }

    /// Returns `true` if `a` and `b` are within the configured tolerances.
    pub fn weights_similar(&self, a: f64, b: f64) -> bool {
        let diff = (a - b).abs();
        if diff <= self.epsilon {
            return true;
        }
        let avg = (a.abs() + b.abs()) / 2.0;
        diff < avg * self.weight_tolerance
    }
}
