//! Option type, also used as the wall side
//!
//! Put walls sit below spot (support), call walls above (resistance).

use serde::{Deserialize, Serialize};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Whether a strike lies on this side's side of spot (strictly)
    pub fn on_price_side(&self, strike: f64, spot: f64) -> bool {
        match self {
            OptionType::Call => strike > spot,
            OptionType::Put => strike < spot,
        }
    }

    /// Synthetic wall used when there is no usable exposure data
    pub fn fallback_wall(&self, spot: f64) -> f64 {
        match self {
            OptionType::Call => spot * 1.05,
            OptionType::Put => spot * 0.95,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_price_side() {
        assert!(OptionType::Put.on_price_side(95.0, 100.0));
        assert!(!OptionType::Put.on_price_side(100.0, 100.0));
        assert!(OptionType::Call.on_price_side(105.0, 100.0));
        assert!(!OptionType::Call.on_price_side(95.0, 100.0));
    }

    #[test]
    fn test_fallback_wall() {
        assert!((OptionType::Put.fallback_wall(200.0) - 190.0).abs() < 1e-9);
        assert!((OptionType::Call.fallback_wall(200.0) - 210.0).abs() < 1e-9);
    }
}
