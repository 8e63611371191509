//! Criterion benchmarks for ratecal_models.
//!
//! Measures SABR implied volatility evaluation and per-engine smile
//! calibration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::calibration::{VolCalibrationConfig, VolCalibrator, VolQuote};
use ratecal_models::models::SabrParams;

fn smile_quotes() -> Vec<VolQuote> {
    let params = SabrParams::new(0.25, -0.3, 0.6).unwrap();
    (0..9)
        .map(|i| {
            let strike = 0.02 + 0.0025 * i as f64;
            VolQuote::new(1.0, strike, params.implied_vol(1.0, strike, 0.03), 0.03)
        })
        .collect()
}

/// Benchmark the Hagan formula across a strike strip.
fn bench_implied_vol(c: &mut Criterion) {
    let params = SabrParams::new(0.25, -0.3, 0.6).unwrap();
    let strikes: Vec<f64> = (0..50).map(|i| 0.01 + 0.001 * i as f64).collect();

    c.bench_function("sabr_implied_vol_50", |b| {
        b.iter(|| {
            for &k in &strikes {
                black_box(params.implied_vol(black_box(1.0), k, 0.03));
            }
        })
    });
}

/// Benchmark one smile calibration per engine.
fn bench_smile_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("smile_calibration");
    let quotes = smile_quotes();

    for engine in [
        CalibrationEngine::DefaultLeastSquares,
        CalibrationEngine::LevenbergMarquardt,
        CalibrationEngine::Sqp,
    ] {
        let calibrator = VolCalibrator::new(VolCalibrationConfig::default().with_engine(engine));
        group.bench_with_input(BenchmarkId::from_parameter(engine), &quotes, |b, quotes| {
            b.iter(|| calibrator.calibrate(black_box(quotes)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_implied_vol, bench_smile_calibration);
criterion_main!(benches);
