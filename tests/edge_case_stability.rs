//! Edge case and numerical stability tests
//!
//! Covers the boundary behavior of weight generation and differencing:
//! integer orders, threshold extremes, missing values, very short and very
//! long inputs, and large-magnitude data.

use assert_approx_eq::assert_approx_eq;
use fracdiff::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

fn binomial(n: u64, k: u64) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

#[test]
fn test_integer_orders_give_signed_binomial_weights() {
    for d in 0..=5u64 {
        let weights = generate_weights(d as f64, 100, WindowMethod::Fixed, 1e-12, 1_000).unwrap();
        assert_eq!(weights.len(), d as usize + 1, "d = {}", d);

        // oldest lag first
        for (pos, w) in weights.as_slice().iter().enumerate() {
            let lag = d - pos as u64;
            let sign = if lag % 2 == 0 { 1.0 } else { -1.0 };
            assert_approx_eq!(*w, sign * binomial(d, lag), 1e-12);
        }
    }
}

#[test]
fn test_fixed_window_length_shrinks_as_threshold_grows() {
    let thresholds = [1e-6, 1e-5, 1e-4, 1e-3, 1e-2, 1e-1];
    for &d in &[0.1, 0.35, 0.6, 0.85] {
        let lengths: Vec<usize> = thresholds
            .iter()
            .map(|&t| {
                generate_weights(d, 10, WindowMethod::Fixed, t, 10_000_000)
                    .unwrap()
                    .len()
            })
            .collect();
        assert!(
            lengths.windows(2).all(|pair| pair[0] >= pair[1]),
            "d = {}: {:?}",
            d,
            lengths
        );
    }
}

#[test]
fn test_weights_sum_toward_zero_for_positive_order() {
    // (1 - L)^d evaluated at L = 1 is zero for d > 0
    let weights = generate_weights(0.5, 20_000, WindowMethod::Expanding, 0.0, usize::MAX).unwrap();
    let total: f64 = weights.as_slice().iter().sum();
    assert!(total.abs() < 1e-2, "partial sum {}", total);
    assert_eq!(weights.last(), 1.0);
}

#[test]
fn test_zero_threshold_expanding_skips_everything() {
    let series = Series::from_values(vec![1.0, 2.0, 4.0, 7.0, 11.0]);
    let out = frac_diff(&series, 0.5, WindowMethod::Expanding, 0.0).unwrap();
    assert_eq!(out.offset(), series.len());
    assert!(out.series.is_empty());
}

#[test]
fn test_single_point_series() {
    let series = Series::from_values(vec![42.0]);
    let out = frac_diff(&series, 0.0, WindowMethod::Fixed, 1e-2).unwrap();
    assert_eq!(out.offset(), 1);
    assert!(out.series.is_empty());

    // a window longer than the series falls back and still succeeds
    let out = frac_diff(&series, 0.5, WindowMethod::Fixed, 1e-2).unwrap();
    assert!(out.used_fallback());
    assert!(out.series.is_empty());
}

#[test]
fn test_missing_values_are_dropped_not_filled() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut values: Vec<f64> = (0..200)
        .map(|i| i as f64 + rng.sample::<f64, _>(StandardNormal))
        .collect();
    let holes = [20usize, 21, 90, 150];
    for &h in &holes {
        values[h] = f64::NAN;
    }
    let series = Series::from_values(values);

    let out = frac_diff(&series, 0.4, WindowMethod::Fixed, 1e-2).unwrap();
    let width = out.window.weights_len;
    for &h in &holes {
        assert!(out.series.get(&h).is_none(), "position {} emitted", h);
    }
    for v in out.series.values() {
        assert!(v.is_finite());
    }

    // every position whose window avoids the holes is present
    for idx in out.offset()..series.len() {
        let window_clean = holes.iter().all(|&h| h > idx || h + width <= idx);
        assert_eq!(out.series.get(&idx).is_some(), window_clean, "position {}", idx);
    }
}

#[test]
fn test_large_magnitude_input_stays_finite() {
    let mut rng = StdRng::seed_from_u64(99);
    let values: Vec<f64> = (0..500)
        .map(|_| 1e12 + 1e6 * rng.sample::<f64, _>(StandardNormal))
        .collect();
    let series = Series::from_values(values);

    for method in [WindowMethod::Fixed, WindowMethod::Expanding] {
        let out = frac_diff(&series, 0.7, method, 1e-4).unwrap();
        assert!(!out.series.is_empty());
        assert!(out.series.values().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_level_shift_cancels_in_first_difference() {
    // for d = 1 a level shift cancels out exactly
    let base: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin()).collect();
    let shifted: Vec<f64> = base.iter().map(|v| v + 1_000.0).collect();

    let a = frac_diff(&Series::from_values(base), 1.0, WindowMethod::Fixed, 1e-2).unwrap();
    let b = frac_diff(&Series::from_values(shifted), 1.0, WindowMethod::Fixed, 1e-2).unwrap();
    for (x, y) in a.series.values().iter().zip(b.series.values()) {
        assert_approx_eq!(*x, *y, 1e-9);
    }
}

#[test]
fn test_order_grid_endpoints() {
    let grid: Vec<f64> = order_grid(&SearchConfig::default()).collect();
    assert_eq!(grid.len(), 11);
    assert_eq!(grid[0], 0.0);
    assert_approx_eq!(grid[10], 1.0);
    assert!(grid.iter().all(|d| *d <= 1.0));

    let single: Vec<f64> = order_grid(&SearchConfig::new(0.4, 0.4, 0.1)).collect();
    assert_eq!(single, vec![0.4]);

    let uneven: Vec<f64> = order_grid(&SearchConfig::new(0.0, 1.0, 0.3)).collect();
    assert_eq!(uneven.len(), 4);
    assert_approx_eq!(uneven[3], 0.9);
}

#[test]
fn test_adf_critical_values_approach_asymptotic() {
    let small = mackinnon_critical_values(25);
    let large = mackinnon_critical_values(1_000_000);
    assert_approx_eq!(large[0].1, -3.43035, 1e-4);
    assert_approx_eq!(large[1].1, -2.86154, 1e-4);
    assert_approx_eq!(large[2].1, -2.56677, 1e-4);
    for level in 0..3 {
        assert!(small[level].1 < large[level].1);
    }
    assert_eq!(small[1].0, 0.05);
}

#[test]
fn test_adf_p_value_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    let noise: Vec<f64> = (0..300).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
    let report = augmented_dickey_fuller(&noise).unwrap();
    assert!(report.p_value >= 0.0 && report.p_value <= 1.0);
    assert_eq!(report.observations, 298);
    assert_eq!(report.used_lag, 1);
}
