//! # GEX Levels - Gamma Walls and Max Pain
//!
//! Turns per-strike gamma exposure and open interest into the price levels
//! an options desk watches: support and resistance "walls" for each expiry
//! bucket, and the max pain strike for each expiry.
//!
//! ## Key Components
//!
//! - **Series**: Normalization of raw strike→exposure maps
//! - **Locator**: Max-GEX, centroid and cumulative-threshold wall candidates, blended
//! - **Distinctness**: Scored re-ranking so buckets don't share a wall
//! - **Max Pain**: IV-windowed, dealer-tilted, gamma-weighted payout minimization
//! - **Scan**: Parallel driver across symbols
//!
//! ## Usage
//!
//! ```rust
//! use gex_levels::prelude::*;
//!
//! let series = normalize(vec![(95.0, -800.0), (100.0, 300.0), (105.0, 1200.0)]);
//! let config = WallConfig::default();
//!
//! let support = select(&series, 101.0, OptionType::Put, &Bucket::Weekly, &[], &config);
//! let resistance = select(&series, 101.0, OptionType::Call, &Bucket::Weekly, &[], &config);
//! assert!(support.wall < 101.0 && resistance.wall > 101.0);
//!
//! let calls = vec![ChainRow::new(100.0).with_open_interest(500.0)];
//! let puts = vec![ChainRow::new(100.0).with_open_interest(700.0)];
//! let pain = compute_max_pain(&calls, &puts, 101.0, 7, &MaxPainConfig::default());
//! assert_eq!(pain, 100.0);
//! ```
//!
//! ## Failure Model
//!
//! Computation never fails. Malformed values are filtered, empty inputs take
//! documented fallbacks, and implausible max pain picks are clamped. Errors
//! exist only when loading configuration.

pub mod config;
pub mod core;
pub mod max_pain;
pub mod models;
pub mod scan;
pub mod walls;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{rows_from_json, ChainRow, GexError, GexResult, Numeric, OptionType};

    // Configuration
    pub use crate::config::LevelsConfig;

    // Walls
    pub use crate::walls::{
        locate, normalize, rank_alternatives, resolve_walls, select, Bucket, BucketWall,
        DistinctWeights, FallbackReason, GexPoint, GexSeries, MethodCandidates, MethodWeights,
        RankedStrike, ScoredCandidate, WallConfig, WallLocation, WallMethod, WallResolver,
        WallSelection,
    };

    // Max pain
    pub use crate::max_pain::{
        analyze_max_pain, compute_max_pain, MaxPainAnalysis, MaxPainConfig, WindowScope,
    };

    // Scan
    pub use crate::scan::{
        scan_symbol, scan_symbols, BucketMaxPain, BucketSnapshot, SymbolLevels, SymbolSnapshot,
    };
}

// Re-export main types at crate root
pub use crate::core::{GexError, GexResult};
pub use crate::config::LevelsConfig;
