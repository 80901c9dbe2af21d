//! Black-Scholes Model
//!
//! Provides the pieces the max pain engine needs to weight open interest by
//! gamma: the d1 parameter, the standard normal density, and gamma itself.

use std::f64::consts::PI;

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter (no dividend yield)
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes gamma (same for call and put)
///
/// Returns 0.0 for degenerate inputs (non-positive spot, strike, vol or time)
/// rather than propagating NaN.
pub fn gamma(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || vol <= 0.0 || time <= 0.0 {
        return 0.0;
    }

    let d1 = d1(spot, strike, rate, vol, time);
    let g = norm_pdf(d1) / (spot * vol * time.sqrt());

    if g.is_finite() {
        g
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_pdf() {
        assert!((norm_pdf(0.0) - 0.398_942_28).abs() < 1e-8);
        assert!((norm_pdf(1.0) - norm_pdf(-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_known_value() {
        // S=K=100, r=5%, vol=20%, T=1: d1 = 0.35, gamma = pdf(0.35) / 20
        let g = gamma(100.0, 100.0, 0.05, 0.20, 1.0);
        let expected = norm_pdf(0.35) / 20.0;
        assert!((g - expected).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_peaks_near_the_money() {
        let atm = gamma(100.0, 100.0, 0.045, 0.25, 7.0 / 365.0);
        let otm = gamma(100.0, 120.0, 0.045, 0.25, 7.0 / 365.0);
        let itm = gamma(100.0, 80.0, 0.045, 0.25, 7.0 / 365.0);

        assert!(atm > otm);
        assert!(atm > itm);
    }

    #[test]
    fn test_gamma_degenerate_inputs() {
        assert_eq!(gamma(0.0, 100.0, 0.05, 0.2, 1.0), 0.0);
        assert_eq!(gamma(100.0, 100.0, 0.05, 0.0, 1.0), 0.0);
        assert_eq!(gamma(100.0, 100.0, 0.05, 0.2, 0.0), 0.0);
    }
}
