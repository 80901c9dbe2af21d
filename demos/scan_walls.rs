//! Example: Resolve gamma walls and max pain for a few synthetic symbols
//!
//! Run with: RUST_LOG=gex_levels=debug cargo run --example scan_walls

use gex_levels::prelude::*;
use tracing_subscriber::EnvFilter;

/// Exposure bumps at a few strikes over a decaying background
fn synthetic_gex(spot: f64, bumps: &[(f64, f64)]) -> GexSeries {
    let strikes = (80..=120).map(|pct| spot * pct as f64 / 100.0);
    normalize(strikes.map(|k| {
        let background = 400.0 / (1.0 + (k - spot).abs());
        let bump: f64 = bumps
            .iter()
            .filter(|(at, _)| (k - at).abs() < 1e-9)
            .map(|(_, size)| size)
            .sum();
        (k, background + bump)
    }))
}

fn synthetic_chain(spot: f64, skew: f64, iv: f64) -> Vec<ChainRow> {
    (85..=115)
        .map(|pct| {
            let k = spot * pct as f64 / 100.0;
            let oi = (1_500.0 / (1.0 + (k - spot * skew).abs())).round();
            ChainRow::new(k).with_open_interest(oi).with_iv(iv)
        })
        .collect()
}

fn snapshot(symbol: &str, spot: f64, bumps: &[(f64, f64)], iv: f64) -> SymbolSnapshot {
    let buckets = [(Bucket::Weekly, 4), (Bucket::Swing, 16), (Bucket::Long, 45), (Bucket::Quarterly, 90)]
        .into_iter()
        .map(|(bucket, dte)| BucketSnapshot {
            bucket,
            dte,
            gex: synthetic_gex(spot, bumps),
            calls: synthetic_chain(spot, 1.03, iv),
            puts: synthetic_chain(spot, 0.97, iv),
        })
        .collect();

    SymbolSnapshot {
        symbol: symbol.to_string(),
        spot,
        buckets,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let snapshots = vec![
        snapshot("SPY", 500.0, &[(475.0, 5_000.0), (530.0, 4_000.0)], 0.18),
        snapshot("QQQ", 400.0, &[(388.0, 3_000.0), (420.0, 6_000.0)], 0.32),
        snapshot("TSLA", 200.0, &[(180.0, 2_500.0), (230.0, 2_000.0)], 0.55),
    ];

    let config = LevelsConfig::default();
    let results = scan_symbols(&snapshots, &config);

    println!("=== Gamma Walls ===\n");
    for levels in &results {
        println!("{} (spot {:.2})", levels.symbol, levels.spot);
        for (put, call) in levels.put_walls.iter().zip(&levels.call_walls) {
            println!(
                "  {:<10} support {:>8.2} [{}]  resistance {:>8.2} [{}]",
                put.bucket.label(),
                put.selection.wall,
                put.selection.method.label(),
                call.selection.wall,
                call.selection.method.label(),
            );
        }
        for mp in &levels.max_pain {
            println!(
                "  {:<10} max pain {:>8.2}{}",
                mp.bucket.label(),
                mp.strike,
                if mp.guardrail_applied { " (guardrail)" } else { "" }
            );
        }
        println!();
    }

    println!("--- JSON ---\n");
    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}
