//! Distinctness Enforcement Across Buckets
//!
//! Independently located walls often land on the same strike for adjacent
//! buckets. When a bucket's weighted candidate sits within the minimum
//! separation of a wall already chosen for an earlier bucket, the largest-|gex|
//! strikes are re-ranked by a bucket-specific blend of exposure, uniqueness
//! and proximity, and the best one that clears every earlier wall is taken.
//!
//! The re-rank is greedy: it only looks at buckets already resolved.

use tracing::{debug, warn};

use crate::core::OptionType;

use super::{
    locate, Bucket, DistinctWeights, GexSeries, WallConfig, WallMethod, WallSelection,
};

/// Uniqueness saturates once a candidate is 5% of spot away from a prior wall
const UNIQUENESS_SCALE: f64 = 20.0;

/// A re-ranking candidate with its score components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub strike: f64,
    pub magnitude: f64,
    pub gex_score: f64,
    pub uniqueness_score: f64,
    pub proximity_score: f64,
    pub score: f64,
}

/// Select the wall for one bucket, keeping clear of walls already selected
///
/// # Arguments
/// * `series` - Normalized exposure series for this bucket
/// * `spot` - Current spot price
/// * `side` - Put (support below spot) or call (resistance above spot)
/// * `bucket` - Bucket being resolved; picks the re-ranking blend
/// * `already_selected` - Walls chosen for earlier buckets of the same symbol and side
/// * `config` - Wall configuration
///
/// Never fails: degenerate input yields a fallback selection, and when no
/// alternative clears the separation the weighted candidate is kept.
pub fn select(
    series: &GexSeries,
    spot: f64,
    side: OptionType,
    bucket: &Bucket,
    already_selected: &[f64],
    config: &WallConfig,
) -> WallSelection {
    let restricted;
    let series = if config.allow_outside_price_side {
        series
    } else {
        restricted = series.restrict_to_side(side, spot);
        if restricted.is_empty() {
            series
        } else {
            &restricted
        }
    };

    let location = locate(series, spot, side, config);
    if let Some(reason) = location.fallback {
        let wall = location.candidates.weighted;
        return WallSelection::from_location(location, wall, WallMethod::Fallback { reason });
    }

    let primary = location.candidates.weighted;
    let min_sep_abs = config.min_separation_pct * spot;

    let too_close = already_selected
        .iter()
        .any(|prior| (primary - prior).abs() <= min_sep_abs);
    if !too_close {
        return WallSelection::from_location(location, primary, WallMethod::Weighted);
    }

    debug!(
        bucket = bucket.label(),
        side = side.label(),
        primary,
        "weighted wall collides with an earlier bucket, re-ranking"
    );

    let ranked = rank_alternatives(
        series,
        spot,
        already_selected,
        config.max_distance_pct,
        config.candidate_pool_size,
        bucket.distinct_weights(),
    );

    let clear = ranked.iter().find(|c| {
        already_selected
            .iter()
            .all(|prior| (c.strike - prior).abs() > min_sep_abs)
    });

    match clear {
        Some(candidate) => WallSelection::from_location(
            location,
            candidate.strike,
            WallMethod::DistinctWeighted {
                score: candidate.score,
                displaced: primary,
            },
        ),
        None => {
            warn!(
                bucket = bucket.label(),
                side = side.label(),
                primary,
                pool = ranked.len(),
                "no candidate clears the separation, keeping the weighted wall"
            );
            WallSelection::from_location(location, primary, WallMethod::Weighted)
        }
    }
}

/// Score and rank the largest-|gex| strikes as alternative walls
///
/// Candidates are sorted by blended score, descending; ties keep |gex| order.
pub fn rank_alternatives(
    series: &GexSeries,
    spot: f64,
    already_selected: &[f64],
    max_distance_pct: f64,
    pool_size: usize,
    weights: DistinctWeights,
) -> Vec<ScoredCandidate> {
    let pool = series.top_by_magnitude(pool_size);
    let max_magnitude = pool.iter().map(|r| r.magnitude).fold(0.0, f64::max);
    let reach = max_distance_pct * spot;

    let mut scored: Vec<ScoredCandidate> = pool
        .into_iter()
        .map(|r| {
            let gex_score = if max_magnitude > 0.0 {
                r.magnitude / max_magnitude
            } else {
                0.0
            };
            let uniqueness_score = uniqueness(r.strike, spot, already_selected);
            let proximity_score = if reach > 0.0 {
                (1.0 - (r.strike - spot).abs() / reach).max(0.0)
            } else {
                0.0
            };

            ScoredCandidate {
                strike: r.strike,
                magnitude: r.magnitude,
                gex_score,
                uniqueness_score,
                proximity_score,
                score: weights.score(gex_score, uniqueness_score, proximity_score),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Distance to the closest prior wall, scaled so 5% of spot saturates at 1
fn uniqueness(strike: f64, spot: f64, already_selected: &[f64]) -> f64 {
    already_selected
        .iter()
        .map(|prior| ((strike - prior).abs() / spot * UNIQUENESS_SCALE).min(1.0))
        .fold(1.0, f64::min)
}
