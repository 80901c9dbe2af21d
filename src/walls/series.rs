//! GEX Series Normalization
//!
//! Turns a raw strike→exposure mapping into a clean series: numeric, finite,
//! ascending by strike, one entry per strike.

use serde::{Deserialize, Serialize};

use crate::core::{Numeric, OptionType};

use super::RankedStrike;

/// Signed gamma exposure at one strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GexPoint {
    pub strike: f64,
    pub gex: f64,
}

/// Strike-ordered gamma exposure series
///
/// Invariant: finite strikes and exposures, strictly ascending strikes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GexPoint>", into = "Vec<GexPoint>")]
pub struct GexSeries {
    points: Vec<GexPoint>,
}

/// Normalize raw strike→exposure pairs into a [`GexSeries`]
///
/// Entries whose key or value fails numeric coercion, or is NaN/±infinity,
/// are dropped. Duplicate strikes keep the last value seen. Never fails:
/// garbage input yields an empty series.
pub fn normalize<I, K, V>(raw: I) -> GexSeries
where
    I: IntoIterator<Item = (K, V)>,
    K: Numeric,
    V: Numeric,
{
    let points: Vec<GexPoint> = raw
        .into_iter()
        .filter_map(|(k, v)| {
            Some(GexPoint {
                strike: k.to_finite()?,
                gex: v.to_finite()?,
            })
        })
        .collect();

    GexSeries::from(points)
}

impl From<Vec<GexPoint>> for GexSeries {
    fn from(mut points: Vec<GexPoint>) -> Self {
        points.retain(|p| p.strike.is_finite() && p.gex.is_finite());
        // Stable: among equal strikes, input order is preserved
        points.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        let mut deduped: Vec<GexPoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.strike == point.strike => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }
}

impl From<GexSeries> for Vec<GexPoint> {
    fn from(series: GexSeries) -> Self {
        series.points
    }
}

impl GexSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GexPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &GexPoint> {
        self.points.iter()
    }

    pub fn strikes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.strike).collect()
    }

    /// Lowest strike
    pub fn first_strike(&self) -> Option<f64> {
        self.points.first().map(|p| p.strike)
    }

    /// Exposure at an exact strike
    pub fn gex_at(&self, strike: f64) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.strike.total_cmp(&strike))
            .ok()
            .map(|i| self.points[i].gex)
    }

    /// Points with `lo <= strike <= hi`
    pub fn window(&self, lo: f64, hi: f64) -> GexSeries {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.strike >= lo && p.strike <= hi)
                .copied()
                .collect(),
        }
    }

    /// Points strictly on the side's side of spot
    pub fn restrict_to_side(&self, side: OptionType, spot: f64) -> GexSeries {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| side.on_price_side(p.strike, spot))
                .copied()
                .collect(),
        }
    }

    /// Sum of |gex|
    pub fn total_abs(&self) -> f64 {
        self.points.iter().map(|p| p.gex.abs()).sum()
    }

    /// First point (ascending) with the largest |gex|
    pub fn max_abs_point(&self) -> Option<GexPoint> {
        let mut best: Option<GexPoint> = None;
        for p in &self.points {
            match best {
                Some(b) if p.gex.abs() <= b.gex.abs() => {}
                _ => best = Some(*p),
            }
        }
        best
    }

    /// The `n` largest-|gex| strikes, descending; ties keep ascending strike order
    pub fn top_by_magnitude(&self, n: usize) -> Vec<RankedStrike> {
        let mut ranked: Vec<RankedStrike> = self
            .points
            .iter()
            .map(|p| RankedStrike {
                strike: p.strike,
                magnitude: p.gex.abs(),
            })
            .collect();
        ranked.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        ranked.truncate(n);
        ranked
    }

    /// Snap a target price to the nearest quoted strike
    ///
    /// Scans ascending; the first strike at the minimal distance wins, so an
    /// equidistant target snaps to the lower strike.
    pub fn snap(&self, target: f64) -> Option<f64> {
        let mut iter = self.points.iter();
        let first = iter.next()?;
        let mut best = first.strike;
        let mut best_dist = (first.strike - target).abs();

        for p in iter {
            let dist = (p.strike - target).abs();
            if dist < best_dist {
                best = p.strike;
                best_dist = dist;
            }
        }

        Some(best)
    }
}
