//! Max Pain Engine
//!
//! Finds the strike at which option holders collect the least at expiry.
//!
//! 1. Strike window sized from the chain's median IV, widened when too sparse
//! 2. Effective OI per side (volume stands in for missing OI), tilted by dealer bias
//! 3. Optional Black-Scholes gamma weighting toward the money
//! 4. Payout at every window strike in one pass over prefix sums
//! 5. Guardrail against picks implausibly far from spot

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ChainRow;
use crate::models::black_scholes;

use super::MaxPainConfig;

/// Which strike window the sweep ran over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowScope {
    /// IV-informed half-width
    Base,
    /// Half-width × 1.5
    Widened,
    /// Every quoted strike
    Full,
    /// No usable strikes; spot returned unchanged
    Empty,
}

/// Max pain result with the intermediate values that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxPainAnalysis {
    /// Selected strike (after guardrail)
    pub strike: f64,
    /// Payout-minimizing strike before the guardrail
    pub unguarded_strike: f64,
    pub guardrail_applied: bool,
    /// Median chain IV (decimal) or the configured default
    pub iv: f64,
    /// Base window half-width in price units
    pub half_width: f64,
    pub scope: WindowScope,
    /// Window strikes, ascending
    pub strikes: Vec<f64>,
    /// Total holder payout at each window strike
    pub total_pain: Vec<f64>,
}

impl MaxPainAnalysis {
    fn unchanged(spot: f64, iv: f64) -> Self {
        Self {
            strike: spot,
            unguarded_strike: spot,
            guardrail_applied: false,
            iv,
            half_width: 0.0,
            scope: WindowScope::Empty,
            strikes: Vec::new(),
            total_pain: Vec::new(),
        }
    }
}

/// Compute the max pain strike
///
/// # Arguments
/// * `calls` / `puts` - Chain rows for one expiry
/// * `spot` - Current spot price
/// * `dte` - Days to expiry
/// * `config` - Engine configuration
///
/// Returns `spot` for an empty chain or non-positive spot. Never fails.
pub fn compute_max_pain(
    calls: &[ChainRow],
    puts: &[ChainRow],
    spot: f64,
    dte: u32,
    config: &MaxPainConfig,
) -> f64 {
    analyze_max_pain(calls, puts, spot, dte, config).strike
}

/// Compute max pain and return the full analysis
pub fn analyze_max_pain(
    calls: &[ChainRow],
    puts: &[ChainRow],
    spot: f64,
    dte: u32,
    config: &MaxPainConfig,
) -> MaxPainAnalysis {
    let iv = median_iv(calls, puts).unwrap_or(config.default_iv);

    if (calls.is_empty() && puts.is_empty()) || !spot.is_finite() || spot <= 0.0 {
        return MaxPainAnalysis::unchanged(spot, iv);
    }

    let universe = strike_universe(calls, puts);
    if universe.is_empty() {
        return MaxPainAnalysis::unchanged(spot, iv);
    }

    let half_width = spot * band_fraction(iv);
    let (scope, strikes) = select_window(&universe, spot, half_width, config.min_strikes);
    if scope != WindowScope::Base {
        debug!(
            ?scope,
            strikes = strikes.len(),
            min_strikes = config.min_strikes,
            "max pain window widened"
        );
    }

    let bias = config.effective_dealer_bias();
    let mut call_w = side_weights(&strikes, calls);
    let mut put_w = side_weights(&strikes, puts);
    call_w.mapv_inplace(|w| w / bias);
    put_w.mapv_inplace(|w| w * bias);

    if config.use_gamma_weighted_oi {
        let boost = gamma_weights(&strikes, spot, dte, config.risk_free_rate, iv).mapv(|g| 1.0 + g);
        call_w = call_w * &boost;
        put_w = put_w * &boost;
    }

    call_w.mapv_inplace(|w| w * config.contract_multiplier);
    put_w.mapv_inplace(|w| w * config.contract_multiplier);

    let k = Array1::from(strikes.clone());
    let pain = pain_curve(&k, &call_w, &put_w);

    let unguarded_strike = argmin(&pain)
        .map(|i| strikes[i])
        .or_else(|| nearest_to(&strikes, spot))
        .unwrap_or(spot);

    let guardrail_applied = (unguarded_strike - spot).abs() / spot > config.guardrail_pct;
    let strike = if guardrail_applied {
        let nearest = nearest_to(&strikes, spot).unwrap_or(spot);
        debug!(
            unguarded_strike,
            strike = nearest,
            spot,
            "max pain outside guardrail, using nearest strike"
        );
        nearest
    } else {
        unguarded_strike
    };

    MaxPainAnalysis {
        strike,
        unguarded_strike,
        guardrail_applied,
        iv,
        half_width,
        scope,
        strikes,
        total_pain: pain.to_vec(),
    }
}

/// Ascending, de-duplicated finite strikes across both sides
fn strike_universe(calls: &[ChainRow], puts: &[ChainRow]) -> Vec<f64> {
    let mut strikes: Vec<f64> = calls
        .iter()
        .chain(puts.iter())
        .map(|r| r.strike)
        .filter(|k| k.is_finite())
        .collect();
    strikes.sort_by(|a, b| a.total_cmp(b));
    strikes.dedup();
    strikes
}

/// Median of every usable IV across calls and puts
fn median_iv(calls: &[ChainRow], puts: &[ChainRow]) -> Option<f64> {
    let mut ivs: Vec<f64> = calls
        .iter()
        .chain(puts.iter())
        .filter_map(ChainRow::valid_iv)
        .collect();
    if ivs.is_empty() {
        return None;
    }

    ivs.sort_by(|a, b| a.total_cmp(b));
    let mid = ivs.len() / 2;
    if ivs.len() % 2 == 0 {
        Some((ivs[mid - 1] + ivs[mid]) / 2.0)
    } else {
        Some(ivs[mid])
    }
}

/// Window half-width as a fraction of spot, wider for higher IV
fn band_fraction(iv: f64) -> f64 {
    let iv_pct = iv * 100.0;
    if iv_pct > 40.0 {
        0.20
    } else if iv_pct > 25.0 {
        0.15
    } else {
        0.12
    }
}

fn select_window(
    universe: &[f64],
    spot: f64,
    half_width: f64,
    min_strikes: usize,
) -> (WindowScope, Vec<f64>) {
    for (scope, mult) in [(WindowScope::Base, 1.0), (WindowScope::Widened, 1.5)] {
        let reach = half_width * mult;
        let inside: Vec<f64> = universe
            .iter()
            .copied()
            .filter(|k| (k - spot).abs() <= reach)
            .collect();
        if inside.len() >= min_strikes {
            return (scope, inside);
        }
    }
    (WindowScope::Full, universe.to_vec())
}

/// Effective OI summed per window strike; rows outside the window are ignored
fn side_weights(strikes: &[f64], rows: &[ChainRow]) -> Array1<f64> {
    let mut weights = Array1::<f64>::zeros(strikes.len());
    for row in rows {
        if let Ok(i) = strikes.binary_search_by(|k| k.total_cmp(&row.strike)) {
            weights[i] += row.effective_oi();
        }
    }
    weights
}

/// Black-Scholes gamma per strike, normalized so the largest is 1
fn gamma_weights(strikes: &[f64], spot: f64, dte: u32, rate: f64, iv: f64) -> Array1<f64> {
    let time = f64::from(dte.max(1)) / 365.0;
    let gammas: Array1<f64> = strikes
        .iter()
        .map(|&k| black_scholes::gamma(spot, k, rate, iv, time))
        .collect();

    let max = gammas.fold(0.0_f64, |acc, &g| acc.max(g));
    if max > 0.0 {
        gammas / max
    } else {
        Array1::zeros(strikes.len())
    }
}

fn cumsum(values: &Array1<f64>) -> Array1<f64> {
    let mut out = values.clone();
    out.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);
    out
}

/// Total holder payout if the underlying settles at each strike
///
/// For settlement `s`: calls pay `s·Σw(k<s) − Σk·w(k<s)`, puts pay
/// `Σk·w(k>s) − s·Σw(k>s)`. Both come from running sums of `w` and `k·w`.
pub(crate) fn pain_curve(k: &Array1<f64>, call_w: &Array1<f64>, put_w: &Array1<f64>) -> Array1<f64> {
    let call_kw = k * call_w;
    let put_kw = k * put_w;

    let cum_call_w = cumsum(call_w);
    let cum_call_kw = cumsum(&call_kw);
    let cum_put_w = cumsum(put_w);
    let cum_put_kw = cumsum(&put_kw);

    // Strictly below s
    let call_w_below = &cum_call_w - call_w;
    let call_kw_below = &cum_call_kw - &call_kw;
    let call_pain = k * &call_w_below - &call_kw_below;

    // Strictly above s
    let put_w_above = put_w.sum() - &cum_put_w;
    let put_kw_above = put_kw.sum() - &cum_put_kw;
    let put_pain = &put_kw_above - &(k * &put_w_above);

    call_pain + put_pain
}

/// Index of the first minimal finite value
fn argmin(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// First strike (ascending) at the minimal distance from spot
fn nearest_to(strikes: &[f64], spot: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for &k in strikes {
        match best {
            Some(b) if (k - spot).abs() >= (b - spot).abs() => {}
            _ => best = Some(k),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;

    fn row(strike: f64, oi: f64) -> ChainRow {
        ChainRow::new(strike).with_open_interest(oi)
    }

    /// Direct per-strike payout sum
    fn naive_pain(strikes: &[f64], call_w: &[f64], put_w: &[f64], settle: f64) -> f64 {
        strikes
            .iter()
            .enumerate()
            .map(|(i, &k)| {
                OptionType::Call.intrinsic(settle, k) * call_w[i]
                    + OptionType::Put.intrinsic(settle, k) * put_w[i]
            })
            .sum()
    }

    #[test]
    fn test_single_strike_chain() {
        let calls = vec![row(100.0, 50.0)];
        let puts = vec![row(100.0, 50.0)];

        assert_eq!(compute_max_pain(&calls, &puts, 102.0, 7, &MaxPainConfig::default()), 100.0);
        assert_eq!(compute_max_pain(&calls, &puts, 102.0, 7, &MaxPainConfig::unweighted()), 100.0);
    }

    #[test]
    fn test_two_strike_scenario_matches_hand_computation() {
        let calls = vec![row(100.0, 10.0), row(110.0, 5.0)];
        let puts = vec![row(100.0, 5.0), row(110.0, 20.0)];
        let config = MaxPainConfig {
            use_gamma_weighted_oi: false,
            ..Default::default()
        };

        let analysis = analyze_max_pain(&calls, &puts, 105.0, 14, &config);
        assert_eq!(analysis.strikes, vec![100.0, 110.0]);

        // Call weights: OI / 0.65 × 100; put weights: OI × 0.65 × 100
        let put_110 = 20.0 * 0.65 * 100.0;
        let call_100 = 10.0 / 0.65 * 100.0;
        let pain_100 = (110.0 - 100.0) * put_110;
        let pain_110 = (110.0 - 100.0) * call_100;

        assert!((analysis.total_pain[0] - pain_100).abs() < 1e-6);
        assert!((analysis.total_pain[1] - pain_110).abs() < 1e-6);
        assert_eq!(analysis.strike, 100.0);
        assert!(!analysis.guardrail_applied);
    }

    #[test]
    fn test_prefix_sweep_matches_naive() {
        let strikes: Vec<f64> = (0..12).map(|i| 90.0 + 2.5 * i as f64).collect();
        let call_w: Vec<f64> = (0..12).map(|i| ((i * 37) % 11) as f64 * 100.0).collect();
        let put_w: Vec<f64> = (0..12).map(|i| ((i * 53) % 7) as f64 * 100.0).collect();

        let pain = pain_curve(
            &Array1::from(strikes.clone()),
            &Array1::from(call_w.clone()),
            &Array1::from(put_w.clone()),
        );

        for (i, &s) in strikes.iter().enumerate() {
            let expected = naive_pain(&strikes, &call_w, &put_w, s);
            assert!(
                (pain[i] - expected).abs() < 1e-6 * expected.max(1.0),
                "strike {}: {} vs {}",
                s,
                pain[i],
                expected
            );
        }
    }

    #[test]
    fn test_guardrail_overrides_far_minimum() {
        // Heavy calls at 70 pull the payout minimum 30% below spot
        let calls = vec![row(70.0, 1_000.0)];
        let puts = vec![row(70.0, 1.0), row(100.0, 1.0)];

        let analysis = analyze_max_pain(&calls, &puts, 100.0, 30, &MaxPainConfig::unweighted());

        assert_eq!(analysis.scope, WindowScope::Full);
        assert_eq!(analysis.unguarded_strike, 70.0);
        assert!(analysis.guardrail_applied);
        assert_eq!(analysis.strike, 100.0);
    }

    #[test]
    fn test_degenerate_inputs_return_spot() {
        let config = MaxPainConfig::default();
        assert_eq!(compute_max_pain(&[], &[], 101.5, 7, &config), 101.5);

        let calls = vec![row(100.0, 5.0)];
        assert_eq!(compute_max_pain(&calls, &[], 0.0, 7, &config), 0.0);
        assert_eq!(compute_max_pain(&calls, &[], -3.0, 7, &config), -3.0);

        let nan_rows = vec![row(f64::NAN, 5.0)];
        let analysis = analyze_max_pain(&nan_rows, &[], 100.0, 7, &config);
        assert_eq!(analysis.strike, 100.0);
        assert_eq!(analysis.scope, WindowScope::Empty);
    }

    #[test]
    fn test_window_scope_and_iv_band() {
        let config = MaxPainConfig::unweighted();

        let base: Vec<ChainRow> = [90.0, 95.0, 100.0, 105.0, 110.0]
            .iter()
            .map(|&k| row(k, 10.0))
            .collect();
        let analysis = analyze_max_pain(&base, &base, 100.0, 7, &config);
        assert_eq!(analysis.scope, WindowScope::Base);
        assert!((analysis.iv - 0.25).abs() < 1e-12);
        assert!((analysis.half_width - 12.0).abs() < 1e-9);

        let sparse: Vec<ChainRow> = [85.0, 90.0, 100.0, 110.0, 115.0]
            .iter()
            .map(|&k| row(k, 10.0))
            .collect();
        let analysis = analyze_max_pain(&sparse, &sparse, 100.0, 7, &config);
        assert_eq!(analysis.scope, WindowScope::Widened);
        assert_eq!(analysis.strikes.len(), 5);

        let mut far = sparse.clone();
        far.push(row(60.0, 1.0));
        let strict = MaxPainConfig {
            min_strikes: 7,
            ..config.clone()
        };
        let analysis = analyze_max_pain(&far, &far, 100.0, 7, &strict);
        assert_eq!(analysis.scope, WindowScope::Full);
        assert_eq!(analysis.strikes.first(), Some(&60.0));
    }

    #[test]
    fn test_high_iv_widens_band() {
        let calls: Vec<ChainRow> = [90.0, 100.0, 110.0]
            .iter()
            .map(|&k| row(k, 10.0).with_iv(0.55))
            .collect();
        let puts: Vec<ChainRow> = [90.0, 100.0, 110.0]
            .iter()
            .map(|&k| row(k, 10.0).with_iv(0.45))
            .collect();
        let analysis = analyze_max_pain(&calls, &puts, 100.0, 7, &MaxPainConfig::default());

        assert!((analysis.iv - 0.50).abs() < 1e-12);
        assert!((analysis.half_width - 20.0).abs() < 1e-9);
        assert_eq!(band_fraction(0.30), 0.15);
        assert_eq!(band_fraction(0.25), 0.12);
    }

    #[test]
    fn test_volume_stands_in_for_missing_oi() {
        let strikes = vec![95.0, 100.0];
        let rows = vec![
            ChainRow::new(95.0).with_volume(30.0),
            ChainRow::new(100.0).with_open_interest(0.0).with_volume(8.0),
            ChainRow::new(100.0).with_open_interest(4.0),
            ChainRow::new(120.0).with_open_interest(99.0),
        ];
        let weights = side_weights(&strikes, &rows);
        assert_eq!(weights.to_vec(), vec![30.0, 12.0]);
    }

    #[test]
    fn test_gamma_weights_normalized() {
        let strikes = vec![80.0, 90.0, 100.0, 110.0, 120.0];
        let weights = gamma_weights(&strikes, 100.0, 7, 0.045, 0.25);

        let max = weights.fold(0.0_f64, |acc, &w| acc.max(w));
        assert!((max - 1.0).abs() < 1e-12);
        assert!(weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
        assert!(weights[2] > weights[0]);
        assert!(weights[2] > weights[4]);
    }

    #[test]
    fn test_nearest_to_prefers_lower_on_tie() {
        assert_eq!(nearest_to(&[95.0, 105.0], 100.0), Some(95.0));
        assert_eq!(nearest_to(&[], 100.0), None);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let calls: Vec<ChainRow> = (0..20)
            .map(|i| row(80.0 + 2.0 * i as f64, (i * 13 % 17) as f64).with_iv(0.3))
            .collect();
        let puts: Vec<ChainRow> = (0..20)
            .map(|i| row(80.0 + 2.0 * i as f64, (i * 7 % 19) as f64).with_iv(0.35))
            .collect();
        let config = MaxPainConfig::default();

        let a = analyze_max_pain(&calls, &puts, 99.0, 21, &config);
        let b = analyze_max_pain(&calls, &puts, 99.0, 21, &config);
        assert_eq!(a, b);
        assert!(a.strikes.contains(&a.strike));
    }
}
