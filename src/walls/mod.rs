//! Gamma Wall Detection from Per-Strike Gamma Exposure
//!
//! Finds strikes ("walls") where concentrated dealer hedging flow tends to
//! act as support (put side, below spot) or resistance (call side, above).
//!
//! Pipeline per symbol and side:
//! 1. **Normalization**: raw strike→exposure data becomes a clean, sorted [`GexSeries`]
//! 2. **Location**: max-GEX, centroid and cumulative-threshold candidates, blended
//!    into a weighted candidate snapped to a quoted strike
//! 3. **Distinctness**: buckets resolved in order; a candidate colliding with an
//!    earlier bucket's wall is replaced by a re-ranked alternative

mod config;
mod distinct;
mod locator;
mod resolver;
mod series;

pub use config::*;
pub use distinct::*;
pub use locator::*;
pub use resolver::*;
pub use series::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::OptionType;

/// Expiry-horizon bucket, walled independently
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Weekly,
    Swing,
    Long,
    Quarterly,
    /// Caller-defined bucket; resolved after the standard ones
    Other(String),
}

impl Bucket {
    /// The standard buckets in resolution order
    pub fn standard() -> [Bucket; 4] {
        [Bucket::Weekly, Bucket::Swing, Bucket::Long, Bucket::Quarterly]
    }

    pub fn label(&self) -> &str {
        match self {
            Bucket::Weekly => "weekly",
            Bucket::Swing => "swing",
            Bucket::Long => "long",
            Bucket::Quarterly => "quarterly",
            Bucket::Other(name) => name,
        }
    }

    /// Position in the sequential resolution order (lower resolves first)
    pub fn resolution_rank(&self) -> u8 {
        match self {
            Bucket::Weekly => 0,
            Bucket::Swing => 1,
            Bucket::Long => 2,
            Bucket::Quarterly => 3,
            Bucket::Other(_) => 4,
        }
    }

    /// Re-ranking blend used when this bucket's wall collides with an earlier one
    ///
    /// Shorter horizons keep favoring the dominant wall; longer horizons
    /// push harder for a distinct level.
    pub fn distinct_weights(&self) -> DistinctWeights {
        match self {
            Bucket::Weekly => DistinctWeights::new(0.85, 0.10, 0.05),
            Bucket::Swing => DistinctWeights::new(0.70, 0.20, 0.10),
            Bucket::Long => DistinctWeights::new(0.55, 0.35, 0.10),
            Bucket::Quarterly | Bucket::Other(_) => DistinctWeights::new(0.45, 0.45, 0.10),
        }
    }

    /// Classify days-to-expiry into a bucket
    pub fn from_dte(days: i64) -> Self {
        if days <= 7 {
            Bucket::Weekly
        } else if days <= 21 {
            Bucket::Swing
        } else if days <= 60 {
            Bucket::Long
        } else {
            Bucket::Quarterly
        }
    }

    /// Classify an expiry date relative to `today`
    pub fn from_expiry(expiry: NaiveDate, today: NaiveDate) -> Self {
        Self::from_dte((expiry - today).num_days())
    }
}

impl From<&str> for Bucket {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "weekly" => Bucket::Weekly,
            "swing" => Bucket::Swing,
            "long" => Bucket::Long,
            "quarterly" => Bucket::Quarterly,
            _ => Bucket::Other(name.to_string()),
        }
    }
}

/// Why a wall fell back to a synthetic offset from spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No strikes survived normalization
    EmptySeries,
    /// Spot was non-positive or not finite
    InvalidSpot,
}

/// How a wall strike was chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WallMethod {
    MaxGex,
    Centroid,
    Cumulative,
    /// Weighted blend of the three single-method candidates
    Weighted,
    /// Re-ranked alternative replacing a weighted pick that collided
    DistinctWeighted {
        /// Blended re-ranking score of the chosen strike
        score: f64,
        /// The weighted candidate that was displaced
        displaced: f64,
    },
    /// Synthetic strike offset from spot
    Fallback { reason: FallbackReason },
}

impl WallMethod {
    pub fn label(&self) -> &'static str {
        match self {
            WallMethod::MaxGex => "max_gex",
            WallMethod::Centroid => "centroid",
            WallMethod::Cumulative => "cumulative",
            WallMethod::Weighted => "weighted",
            WallMethod::DistinctWeighted { .. } => "distinct_weighted",
            WallMethod::Fallback { .. } => "fallback",
        }
    }
}

/// Candidate strikes produced by each locating method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodCandidates {
    pub max_gex: f64,
    pub centroid: f64,
    pub cumulative: f64,
    pub weighted: f64,
}

impl MethodCandidates {
    /// Every method agreeing on one strike
    pub fn uniform(strike: f64) -> Self {
        Self {
            max_gex: strike,
            centroid: strike,
            cumulative: strike,
            weighted: strike,
        }
    }

    /// Candidate for a single-method tag; `None` for derived methods
    pub fn strike_for(&self, method: &WallMethod) -> Option<f64> {
        match method {
            WallMethod::MaxGex => Some(self.max_gex),
            WallMethod::Centroid => Some(self.centroid),
            WallMethod::Cumulative => Some(self.cumulative),
            WallMethod::Weighted => Some(self.weighted),
            WallMethod::DistinctWeighted { .. } | WallMethod::Fallback { .. } => None,
        }
    }
}

/// A strike with its absolute exposure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedStrike {
    pub strike: f64,
    pub magnitude: f64,
}

/// Output of the locator for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLocation {
    pub candidates: MethodCandidates,
    /// Largest |gex| over total |gex| in the window; exactly 1.0 only when a
    /// single strike carries nonzero exposure
    pub dominance: f64,
    /// Largest-|gex| strikes, descending
    pub top: Vec<RankedStrike>,
    /// Set when the input was degenerate and candidates are synthetic
    pub fallback: Option<FallbackReason>,
}

impl WallLocation {
    pub fn fallback(side: OptionType, spot: f64, reason: FallbackReason) -> Self {
        Self {
            candidates: MethodCandidates::uniform(side.fallback_wall(spot)),
            dominance: 0.0,
            top: Vec::new(),
            fallback: Some(reason),
        }
    }
}

/// Final wall for one (symbol, side, bucket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSelection {
    pub wall: f64,
    #[serde(flatten)]
    pub method: WallMethod,
    pub dominance: f64,
    pub top5: Vec<RankedStrike>,
    pub candidates: MethodCandidates,
}

impl WallSelection {
    pub(crate) fn from_location(location: WallLocation, wall: f64, method: WallMethod) -> Self {
        Self {
            wall,
            method,
            dominance: location.dominance,
            top5: location.top,
            candidates: location.candidates,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.method, WallMethod::Fallback { .. })
    }

    /// Signed distance from spot as a fraction of spot
    pub fn distance_pct(&self, spot: f64) -> f64 {
        if spot > 0.0 {
            (self.wall - spot) / spot
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_from_dte() {
        assert_eq!(Bucket::from_dte(0), Bucket::Weekly);
        assert_eq!(Bucket::from_dte(7), Bucket::Weekly);
        assert_eq!(Bucket::from_dte(14), Bucket::Swing);
        assert_eq!(Bucket::from_dte(45), Bucket::Long);
        assert_eq!(Bucket::from_dte(120), Bucket::Quarterly);
    }

    #[test]
    fn test_bucket_from_expiry() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        assert_eq!(Bucket::from_expiry(expiry, today), Bucket::Swing);
    }

    #[test]
    fn test_bucket_from_name() {
        assert_eq!(Bucket::from("Weekly"), Bucket::Weekly);
        assert_eq!(Bucket::from("quarterly"), Bucket::Quarterly);
        assert_eq!(Bucket::from("leaps"), Bucket::Other("leaps".to_string()));
        assert_eq!(Bucket::from("leaps").label(), "leaps");
    }

    #[test]
    fn test_distinct_weights_shift_with_horizon() {
        let weekly = Bucket::Weekly.distinct_weights();
        let quarterly = Bucket::Quarterly.distinct_weights();
        assert!(weekly.gex > quarterly.gex);
        assert!(weekly.uniqueness < quarterly.uniqueness);
        assert_eq!(
            Bucket::Other("x".into()).distinct_weights(),
            Bucket::Quarterly.distinct_weights()
        );
    }

    #[test]
    fn test_method_serialization_is_tagged() {
        let method = WallMethod::DistinctWeighted {
            score: 0.5,
            displaced: 100.0,
        };
        let json = serde_json::to_value(method).unwrap();
        assert_eq!(json["method"], "distinct_weighted");
        assert_eq!(json["displaced"], 100.0);

        let json = serde_json::to_value(WallMethod::Fallback {
            reason: FallbackReason::EmptySeries,
        })
        .unwrap();
        assert_eq!(json["method"], "fallback");
        assert_eq!(json["reason"], "empty_series");
    }

    #[test]
    fn test_selection_method_is_flat() {
        let location = WallLocation {
            candidates: MethodCandidates::uniform(95.0),
            dominance: 0.6,
            top: vec![RankedStrike {
                strike: 95.0,
                magnitude: 300.0,
            }],
            fallback: None,
        };
        let selection = WallSelection::from_location(
            location,
            92.0,
            WallMethod::DistinctWeighted {
                score: 0.7,
                displaced: 95.0,
            },
        );

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["method"], "distinct_weighted");
        assert_eq!(json["score"], 0.7);
        assert_eq!(json["displaced"], 95.0);
        assert_eq!(json["wall"], 92.0);

        let back: WallSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_strike_for() {
        let c = MethodCandidates {
            max_gex: 1.0,
            centroid: 2.0,
            cumulative: 3.0,
            weighted: 4.0,
        };
        assert_eq!(c.strike_for(&WallMethod::Centroid), Some(2.0));
        assert_eq!(
            c.strike_for(&WallMethod::Fallback {
                reason: FallbackReason::InvalidSpot
            }),
            None
        );
    }
}
