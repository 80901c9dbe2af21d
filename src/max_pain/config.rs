//! Configuration for the max pain engine

use serde::{Deserialize, Serialize};

use crate::core::error::validate_fraction;
use crate::core::{GexError, GexResult};

/// Max pain configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxPainConfig {
    /// Annual risk-free rate for gamma weighting
    /// Default: 0.045
    pub risk_free_rate: f64,

    /// Dealer-bias tilt: call OI is divided by this, put OI multiplied
    /// Default: 0.65
    pub dealer_bias_factor: f64,

    /// Weight effective OI by normalized Black-Scholes gamma
    /// Default: true
    pub use_gamma_weighted_oi: bool,

    /// Minimum strikes the IV-informed window must hold before widening
    /// Default: 5
    pub min_strikes: usize,

    /// A pick farther than this fraction of spot is replaced by the
    /// nearest-to-spot strike
    /// Default: 0.20
    pub guardrail_pct: f64,

    /// Shares per contract
    /// Default: 100
    pub contract_multiplier: f64,

    /// IV assumed when the chain carries none
    /// Default: 0.25
    pub default_iv: f64,
}

impl Default for MaxPainConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.045,
            dealer_bias_factor: 0.65,
            use_gamma_weighted_oi: true,
            min_strikes: 5,
            guardrail_pct: 0.20,
            contract_multiplier: 100.0,
            default_iv: 0.25,
        }
    }
}

impl MaxPainConfig {
    /// Plain open-interest max pain: no dealer tilt, no gamma weighting
    pub fn unweighted() -> Self {
        Self {
            dealer_bias_factor: 1.0,
            use_gamma_weighted_oi: false,
            ..Default::default()
        }
    }

    /// Dealer bias usable as a divisor; invalid values fall back to the default
    pub(crate) fn effective_dealer_bias(&self) -> f64 {
        if self.dealer_bias_factor.is_finite() && self.dealer_bias_factor > 0.0 {
            self.dealer_bias_factor
        } else {
            Self::default().dealer_bias_factor
        }
    }

    pub fn validate(&self) -> GexResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(GexError::config("risk_free_rate must be finite"));
        }
        if !(self.dealer_bias_factor.is_finite() && self.dealer_bias_factor > 0.0) {
            return Err(GexError::config(format!(
                "dealer_bias_factor must be positive, got {}",
                self.dealer_bias_factor
            )));
        }
        if self.min_strikes == 0 {
            return Err(GexError::config("min_strikes must be at least 1"));
        }
        if !(self.contract_multiplier.is_finite() && self.contract_multiplier > 0.0) {
            return Err(GexError::config("contract_multiplier must be positive"));
        }
        if !(self.default_iv.is_finite() && self.default_iv > 0.0) {
            return Err(GexError::config("default_iv must be positive"));
        }
        validate_fraction("guardrail_pct", self.guardrail_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(MaxPainConfig::default().validate().is_ok());
        assert!(MaxPainConfig::unweighted().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_bias() {
        let config = MaxPainConfig {
            dealer_bias_factor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.effective_dealer_bias(), 0.65);
    }

    #[test]
    fn test_rejects_zero_min_strikes() {
        let config = MaxPainConfig {
            min_strikes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
