//! Configuration for wall location and distinctness enforcement

use serde::{Deserialize, Serialize};

use crate::core::error::validate_fraction;
use crate::core::{GexError, GexResult};

/// Blend weights for the weighted wall candidate
///
/// Passed explicitly so concurrent callers can run different blends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodWeights {
    pub max_gex: f64,
    pub centroid: f64,
    pub cumulative: f64,
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            max_gex: 0.40,
            centroid: 0.35,
            cumulative: 0.25,
        }
    }
}

impl MethodWeights {
    pub fn sum(&self) -> f64 {
        self.max_gex + self.centroid + self.cumulative
    }

    pub fn validate(&self) -> GexResult<()> {
        validate_blend(
            "method weights",
            &[self.max_gex, self.centroid, self.cumulative],
        )
    }
}

/// Re-ranking blend for distinct candidates: (gex, uniqueness, proximity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistinctWeights {
    pub gex: f64,
    pub uniqueness: f64,
    pub proximity: f64,
}

impl DistinctWeights {
    pub fn new(gex: f64, uniqueness: f64, proximity: f64) -> Self {
        Self {
            gex,
            uniqueness,
            proximity,
        }
    }

    pub fn score(&self, gex_score: f64, uniqueness_score: f64, proximity_score: f64) -> f64 {
        self.gex * gex_score + self.uniqueness * uniqueness_score + self.proximity * proximity_score
    }
}

/// Most strikes a selection reports in `top5`
pub const MAX_TOP_N: usize = 5;

/// Wall location configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Half-width of the search window around spot, as a fraction of spot
    /// Default: 0.15
    pub max_distance_pct: f64,

    /// Minimum distance between walls of different buckets, as a fraction of spot
    /// Default: 0.01
    pub min_separation_pct: f64,

    /// Share of window |gex| the cumulative method must accumulate
    /// Default: 0.50
    pub cumulative_threshold_pct: f64,

    /// Allow put walls above spot and call walls below spot
    /// Default: false
    pub allow_outside_price_side: bool,

    /// Blend for the weighted candidate
    pub method_weights: MethodWeights,

    /// Number of largest-|gex| strikes considered when re-ranking
    /// Default: 12
    pub candidate_pool_size: usize,

    /// Number of largest-|gex| strikes reported with each wall, 1 to 5
    /// Default: 5
    pub top_n: usize,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            max_distance_pct: 0.15,
            min_separation_pct: 0.01,
            cumulative_threshold_pct: 0.50,
            allow_outside_price_side: false,
            method_weights: MethodWeights::default(),
            candidate_pool_size: 12,
            top_n: 5,
        }
    }
}

impl WallConfig {
    /// Narrow window, walls hug spot
    pub fn tight() -> Self {
        Self {
            max_distance_pct: 0.08,
            min_separation_pct: 0.005,
            ..Default::default()
        }
    }

    /// Wide window with stronger separation between buckets
    pub fn wide() -> Self {
        Self {
            max_distance_pct: 0.25,
            min_separation_pct: 0.02,
            cumulative_threshold_pct: 0.60,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> GexResult<()> {
        validate_fraction("max_distance_pct", self.max_distance_pct)?;
        validate_fraction("cumulative_threshold_pct", self.cumulative_threshold_pct)?;
        if !self.min_separation_pct.is_finite() || self.min_separation_pct < 0.0 {
            return Err(GexError::config(format!(
                "min_separation_pct must be a non-negative number, got {}",
                self.min_separation_pct
            )));
        }
        if self.candidate_pool_size == 0 {
            return Err(GexError::config("candidate_pool_size must be at least 1"));
        }
        if self.top_n == 0 || self.top_n > MAX_TOP_N {
            return Err(GexError::config(format!(
                "top_n must be between 1 and {}, got {}",
                MAX_TOP_N, self.top_n
            )));
        }
        self.method_weights.validate()
    }
}

fn validate_blend(name: &str, weights: &[f64]) -> GexResult<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(GexError::config(format!(
            "{} must be finite and non-negative: {:?}",
            name, weights
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(GexError::config(format!(
            "{} must sum to 1.0, got {:.6}",
            name, sum
        )));
    }
    Ok(())
}
