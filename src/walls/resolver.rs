//! WallResolver - Sequential bucket resolution for one symbol and side
//!
//! Buckets for the same symbol and side must be resolved one after another in
//! a fixed order, each seeing only the walls of buckets resolved before it.
//! Different symbols and sides share nothing and may run in parallel.

use serde::{Deserialize, Serialize};

use crate::core::OptionType;

use super::{select, Bucket, GexSeries, WallConfig, WallSelection};

/// The wall chosen for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketWall {
    pub bucket: Bucket,
    pub selection: WallSelection,
}

/// Resolves walls across buckets with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct WallResolver {
    config: WallConfig,
}

impl WallResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: WallConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: WallConfig) {
        self.config = config;
    }

    /// Resolve every bucket for one side of one symbol
    ///
    /// Buckets are processed in resolution order (weekly, swing, long,
    /// quarterly, then custom buckets in input order); the result follows
    /// that order.
    pub fn resolve(
        &self,
        buckets: &[(Bucket, GexSeries)],
        spot: f64,
        side: OptionType,
    ) -> Vec<BucketWall> {
        let mut order: Vec<&(Bucket, GexSeries)> = buckets.iter().collect();
        order.sort_by_key(|(bucket, _)| bucket.resolution_rank());

        let mut already_selected: Vec<f64> = Vec::with_capacity(order.len());
        let mut walls: Vec<BucketWall> = Vec::with_capacity(order.len());

        for (bucket, series) in order {
            let selection = select(series, spot, side, bucket, &already_selected, &self.config);
            already_selected.push(selection.wall);
            walls.push(BucketWall {
                bucket: bucket.clone(),
                selection,
            });
        }

        walls
    }
}

/// Convenience function to resolve walls with a given configuration
pub fn resolve_walls(
    buckets: &[(Bucket, GexSeries)],
    spot: f64,
    side: OptionType,
    config: &WallConfig,
) -> Vec<BucketWall> {
    WallResolver::with_config(config.clone()).resolve(buckets, spot, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walls::{normalize, WallMethod};

    fn shared_series() -> GexSeries {
        normalize(vec![
            (380.0, 150.0),
            (385.0, 300.0),
            (390.0, 900.0),
            (392.0, 200.0),
            (395.0, 250.0),
        ])
    }

    #[test]
    fn test_buckets_resolve_in_order() {
        let buckets = vec![
            (Bucket::Quarterly, shared_series()),
            (Bucket::Weekly, shared_series()),
            (Bucket::Swing, shared_series()),
        ];
        let walls = WallResolver::new().resolve(&buckets, 400.0, OptionType::Put);

        let order: Vec<&Bucket> = walls.iter().map(|w| &w.bucket).collect();
        assert_eq!(order, vec![&Bucket::Weekly, &Bucket::Swing, &Bucket::Quarterly]);
        assert_eq!(walls[0].selection.method, WallMethod::Weighted);
    }

    #[test]
    fn test_identical_series_produce_distinct_walls() {
        let buckets: Vec<(Bucket, GexSeries)> = Bucket::standard()
            .into_iter()
            .map(|b| (b, shared_series()))
            .collect();
        let config = WallConfig::default();
        let walls = resolve_walls(&buckets, 400.0, OptionType::Put, &config);
        let min_sep = config.min_separation_pct * 400.0;

        for (i, wall) in walls.iter().enumerate() {
            if let WallMethod::DistinctWeighted { .. } = wall.selection.method {
                for earlier in &walls[..i] {
                    assert!((wall.selection.wall - earlier.selection.wall).abs() > min_sep);
                }
            }
        }
        assert!(matches!(
            walls[1].selection.method,
            WallMethod::DistinctWeighted { .. }
        ));
    }

    #[test]
    fn test_resolution_is_reproducible() {
        let buckets: Vec<(Bucket, GexSeries)> = Bucket::standard()
            .into_iter()
            .map(|b| (b, shared_series()))
            .collect();
        let a = resolve_walls(&buckets, 400.0, OptionType::Put, &WallConfig::default());
        let b = resolve_walls(&buckets, 400.0, OptionType::Put, &WallConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_bucket_resolves_last() {
        let buckets = vec![
            (Bucket::Other("leaps".into()), shared_series()),
            (Bucket::Long, shared_series()),
        ];
        let walls = WallResolver::new().resolve(&buckets, 400.0, OptionType::Put);
        assert_eq!(walls[0].bucket, Bucket::Long);
        assert_eq!(walls[1].bucket, Bucket::Other("leaps".into()));
    }
}
