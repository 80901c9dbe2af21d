//! Multi-symbol scan driver
//!
//! Symbols are independent and are processed in parallel. Within one symbol,
//! each side resolves its buckets sequentially so distinctness only ever sees
//! walls of buckets already resolved.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LevelsConfig;
use crate::core::{ChainRow, OptionType};
use crate::max_pain::analyze_max_pain;
use crate::walls::{resolve_walls, Bucket, BucketWall, GexSeries};

/// Inputs for one expiry bucket of one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSnapshot {
    pub bucket: Bucket,
    /// Days to the bucket's representative expiry
    pub dte: u32,
    pub gex: GexSeries,
    #[serde(default)]
    pub calls: Vec<ChainRow>,
    #[serde(default)]
    pub puts: Vec<ChainRow>,
}

/// Everything needed to compute levels for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub spot: f64,
    pub buckets: Vec<BucketSnapshot>,
}

/// Max pain for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketMaxPain {
    pub bucket: Bucket,
    pub dte: u32,
    pub strike: f64,
    pub guardrail_applied: bool,
}

/// Computed levels for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolLevels {
    pub symbol: String,
    pub spot: f64,
    /// Support walls, in resolution order
    pub put_walls: Vec<BucketWall>,
    /// Resistance walls, in resolution order
    pub call_walls: Vec<BucketWall>,
    /// Max pain per bucket, in input order
    pub max_pain: Vec<BucketMaxPain>,
    pub computed_at: DateTime<Utc>,
}

impl SymbolLevels {
    /// Walls that fell back to a synthetic strike
    pub fn fallback_count(&self) -> usize {
        self.put_walls
            .iter()
            .chain(self.call_walls.iter())
            .filter(|w| w.selection.is_fallback())
            .count()
    }

    pub fn put_wall(&self, bucket: &Bucket) -> Option<f64> {
        find_wall(&self.put_walls, bucket)
    }

    pub fn call_wall(&self, bucket: &Bucket) -> Option<f64> {
        find_wall(&self.call_walls, bucket)
    }
}

fn find_wall(walls: &[BucketWall], bucket: &Bucket) -> Option<f64> {
    walls
        .iter()
        .find(|w| &w.bucket == bucket)
        .map(|w| w.selection.wall)
}

/// Compute walls and max pain for one symbol
pub fn scan_symbol(snapshot: &SymbolSnapshot, config: &LevelsConfig) -> SymbolLevels {
    let series: Vec<(Bucket, GexSeries)> = snapshot
        .buckets
        .iter()
        .map(|b| (b.bucket.clone(), b.gex.clone()))
        .collect();

    let put_walls = resolve_walls(&series, snapshot.spot, OptionType::Put, &config.walls);
    let call_walls = resolve_walls(&series, snapshot.spot, OptionType::Call, &config.walls);

    let max_pain = snapshot
        .buckets
        .iter()
        .map(|b| {
            let analysis = analyze_max_pain(&b.calls, &b.puts, snapshot.spot, b.dte, &config.max_pain);
            BucketMaxPain {
                bucket: b.bucket.clone(),
                dte: b.dte,
                strike: analysis.strike,
                guardrail_applied: analysis.guardrail_applied,
            }
        })
        .collect();

    SymbolLevels {
        symbol: snapshot.symbol.clone(),
        spot: snapshot.spot,
        put_walls,
        call_walls,
        max_pain,
        computed_at: Utc::now(),
    }
}

/// Compute levels for many symbols in parallel
///
/// Output order matches input order. One bad chain never stops the scan:
/// every symbol yields a result.
pub fn scan_symbols(snapshots: &[SymbolSnapshot], config: &LevelsConfig) -> Vec<SymbolLevels> {
    let start = Instant::now();

    let levels: Vec<SymbolLevels> = snapshots
        .par_iter()
        .map(|snapshot| scan_symbol(snapshot, config))
        .collect();

    let buckets: usize = snapshots.iter().map(|s| s.buckets.len()).sum();
    let fallbacks: usize = levels.iter().map(SymbolLevels::fallback_count).sum();
    let guarded = levels
        .iter()
        .flat_map(|l| l.max_pain.iter())
        .filter(|m| m.guardrail_applied)
        .count();
    info!(
        symbols = levels.len(),
        buckets,
        fallbacks,
        guarded,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );

    levels
}
