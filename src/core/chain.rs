//! Option chain rows
//!
//! One side (calls or puts) of a single-expiry chain, indexed by strike.
//! Columns may be missing; consumers degrade gracefully.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::numeric::Numeric;

/// One strike row of a chain side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRow {
    /// Strike price
    pub strike: f64,
    /// Open interest (contracts)
    #[serde(default)]
    pub open_interest: Option<f64>,
    /// Trading volume (contracts)
    #[serde(default)]
    pub volume: Option<f64>,
    /// Implied volatility as a decimal (0.25 = 25%)
    #[serde(default)]
    pub implied_volatility: Option<f64>,
}

impl ChainRow {
    pub fn new(strike: f64) -> Self {
        Self {
            strike,
            open_interest: None,
            volume: None,
            implied_volatility: None,
        }
    }

    pub fn with_open_interest(mut self, oi: f64) -> Self {
        self.open_interest = Some(oi);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_iv(mut self, iv: f64) -> Self {
        self.implied_volatility = Some(iv);
        self
    }

    /// Open interest, substituting volume where OI is zero or missing
    pub fn effective_oi(&self) -> f64 {
        match self.open_interest.to_finite() {
            Some(oi) if oi > 0.0 => oi,
            _ => self
                .volume
                .to_finite()
                .filter(|v| *v > 0.0)
                .unwrap_or(0.0),
        }
    }

    /// Implied volatility if usable (finite and positive)
    pub fn valid_iv(&self) -> Option<f64> {
        self.implied_volatility.to_finite().filter(|iv| *iv > 0.0)
    }

    /// Parse a row from a JSON object
    ///
    /// Requires a numeric `strike`; other columns degrade to `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let strike = value.get("strike").and_then(Numeric::to_finite)?;
        Some(Self::from_json_columns(strike, value))
    }

    fn from_json_columns(strike: f64, value: &Value) -> Self {
        let column = |name: &str| value.get(name).and_then(Numeric::to_f64);
        Self {
            strike,
            open_interest: column("openInterest"),
            volume: column("volume"),
            implied_volatility: column("impliedVolatility"),
        }
    }
}

/// Parse a chain side from JSON
///
/// Accepts either an array of row objects carrying `strike`, or an object
/// keyed by strike whose values hold the remaining columns. Rows without a
/// numeric strike are dropped.
pub fn rows_from_json(value: &Value) -> Vec<ChainRow> {
    match value {
        Value::Array(rows) => rows.iter().filter_map(ChainRow::from_json).collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, row)| {
                let strike = key.as_str().to_finite()?;
                Some(ChainRow::from_json_columns(strike, row))
            })
            .collect(),
        _ => Vec::new(),
    }
}
