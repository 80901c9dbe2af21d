//! Multi-Method Wall Location
//!
//! Computes three independent wall candidates inside a window around spot
//! and blends them into a weighted candidate:
//! - **max_gex**: strike with the largest |gex|
//! - **centroid**: |gex|-weighted mean strike, snapped to a quoted strike
//! - **cumulative**: first strike, walking outward from spot, at which the
//!   running |gex| reaches a share of the window total

use crate::core::OptionType;

use super::{FallbackReason, GexSeries, MethodCandidates, WallConfig, WallLocation, MAX_TOP_N};

/// Locate wall candidates for one series
///
/// # Arguments
/// * `series` - Normalized exposure series
/// * `spot` - Current spot price
/// * `side` - Wall side; only used for the synthetic fallback strike
/// * `config` - Window, blend weights and cumulative threshold
///
/// # Returns
/// Candidates, dominance and the top strikes by |gex|. Degenerate input
/// (empty series, non-positive spot) yields synthetic candidates with
/// `fallback` set.
pub fn locate(
    series: &GexSeries,
    spot: f64,
    side: OptionType,
    config: &WallConfig,
) -> WallLocation {
    if let Some(reason) = degenerate_reason(series, spot) {
        return WallLocation::fallback(side, spot, reason);
    }

    let lo = spot * (1.0 - config.max_distance_pct);
    let hi = spot * (1.0 + config.max_distance_pct);
    let windowed = series.window(lo, hi);
    let window = if windowed.is_empty() { series } else { &windowed };

    let total = window.total_abs();
    let (first, max_point) = match (window.first_strike(), window.max_abs_point()) {
        (Some(first), Some(max_point)) => (first, max_point),
        _ => return WallLocation::fallback(side, spot, FallbackReason::EmptySeries),
    };

    if total <= 0.0 {
        return WallLocation {
            candidates: MethodCandidates::uniform(first),
            dominance: 0.0,
            top: Vec::new(),
            fallback: None,
        };
    }

    let nonzero = window.iter().filter(|p| p.gex != 0.0).count();
    let dominance = if nonzero == 1 {
        1.0
    } else {
        // A tiny second strike can vanish from `total`; keep the ratio below 1
        (max_point.gex.abs() / total).min(1.0 - f64::EPSILON)
    };
    let top = window.top_by_magnitude(config.top_n.min(MAX_TOP_N));

    let max_gex = max_point.strike;
    let centroid = centroid_strike(window, total).unwrap_or(max_gex);
    let cumulative =
        cumulative_strike(window, spot, total, config.cumulative_threshold_pct).unwrap_or(max_gex);

    let w = &config.method_weights;
    let blended = w.max_gex * max_gex + w.centroid * centroid + w.cumulative * cumulative;
    let weighted = window.snap(blended).unwrap_or(max_gex);

    WallLocation {
        candidates: MethodCandidates {
            max_gex,
            centroid,
            cumulative,
            weighted,
        },
        dominance,
        top,
        fallback: None,
    }
}

pub(crate) fn degenerate_reason(series: &GexSeries, spot: f64) -> Option<FallbackReason> {
    if !spot.is_finite() || spot <= 0.0 {
        Some(FallbackReason::InvalidSpot)
    } else if series.is_empty() {
        Some(FallbackReason::EmptySeries)
    } else {
        None
    }
}

/// |gex|-weighted mean strike, snapped to the nearest quoted strike
fn centroid_strike(window: &GexSeries, total: f64) -> Option<f64> {
    let moment: f64 = window.iter().map(|p| p.gex.abs() * p.strike).sum();
    window.snap(moment / total)
}

/// Walk strikes nearest-to-spot first until |gex| reaches `threshold_pct` of total
///
/// Returns `None` if the threshold is never reached.
fn cumulative_strike(window: &GexSeries, spot: f64, total: f64, threshold_pct: f64) -> Option<f64> {
    let mut by_proximity: Vec<_> = window.points().to_vec();
    // Stable: equidistant strikes keep ascending order
    by_proximity.sort_by(|a, b| (a.strike - spot).abs().total_cmp(&(b.strike - spot).abs()));

    let threshold = threshold_pct * total;
    let mut running = 0.0;
    for p in by_proximity {
        running += p.gex.abs();
        if running >= threshold {
            return Some(p.strike);
        }
    }
    None
}
