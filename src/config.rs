//! Combined configuration for wall resolution and max pain
//!
//! Loaded from JSON; any omitted field takes its default.
//!
//! ```json
//! {
//!   "walls": { "max_distance_pct": 0.10, "min_separation_pct": 0.015 },
//!   "max_pain": { "dealer_bias_factor": 0.7 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::GexResult;
use crate::max_pain::MaxPainConfig;
use crate::walls::WallConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    pub walls: WallConfig,
    pub max_pain: MaxPainConfig,
}

impl LevelsConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> GexResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> GexResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> GexResult<()> {
        self.walls.validate()?;
        self.max_pain.validate()
    }
}
