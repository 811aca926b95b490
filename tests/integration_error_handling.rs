//! Integration tests for error handling across the public API
//!
//! Each test drives one failure path end to end and checks the error
//! variant that surfaces, not just that an error occurred.

use fracdiff::*;

#[test]
fn test_invalid_configurations_rejected_up_front() {
    let cases = vec![
        ("nan order", FracDiffConfig::fixed_order(f64::NAN)),
        ("negative threshold", FracDiffConfig::default().with_threshold(-1e-3)),
        ("zero weight cap", FracDiffConfig::default().with_max_weight_terms(0)),
        (
            "inverted interval",
            FracDiffConfig::minimum_order(SearchConfig::new(1.0, 0.0, 0.1)),
        ),
        (
            "zero step",
            FracDiffConfig::minimum_order(SearchConfig::new(0.0, 1.0, 0.0)),
        ),
    ];

    for (label, config) in cases {
        let result = FracDiffTransformer::new(config);
        assert!(
            matches!(
                result,
                Err(FracDiffError::InvalidParameter { .. }) | Err(FracDiffError::InvalidOrder { .. })
            ),
            "{} was accepted",
            label
        );
    }
}

#[test]
fn test_weight_cap_surfaces_as_invalid_order() {
    // a tiny order decays slowly, so a strict threshold needs many terms
    let series = Series::from_values((0..50).map(|v| v as f64).collect());
    let result = frac_diff_with_limit(&series, 0.01, WindowMethod::Fixed, 1e-9, 100);
    match result {
        Err(FracDiffError::InvalidOrder { order, .. }) => assert_eq!(order, 0.01),
        other => panic!("expected InvalidOrder, got {:?}", other),
    }

    // the expanding window is bounded by the series and ignores the cap
    assert!(frac_diff_with_limit(&series, 0.01, WindowMethod::Expanding, 1e-9, 100).is_ok());
}

#[test]
fn test_exhausted_search_is_strict_on_request() {
    // a test that never rejects the unit root
    let never = |values: &[f64]| -> FracDiffResult<StationarityReport> {
        Ok(StationarityReport {
            statistic: 10.0,
            p_value: 1.0,
            observations: values.len(),
            used_lag: 1,
            critical_values: mackinnon_critical_values(values.len()),
        })
    };
    let series = Series::from_values((0..40).map(|v| (v as f64).sqrt()).collect());
    let search = SearchConfig::new(0.0, 0.5, 0.25);

    let outcome =
        find_minimum_order(&series, &search, WindowMethod::Fixed, 1e-2, &never).unwrap();
    assert!(!outcome.is_stationary());
    assert_eq!(outcome.order(), 0.5);
    assert_eq!(outcome.trials().len(), 3);

    match outcome.into_result() {
        Err(FracDiffError::SearchExhausted {
            lower,
            upper,
            last_order,
        }) => {
            assert_eq!(lower, 0.0);
            assert_eq!(upper, 0.5);
            assert_eq!(last_order, 0.5);
        }
        other => panic!("expected SearchExhausted, got {:?}", other),
    }
}

#[test]
fn test_exhausted_column_is_reported_not_failed() {
    let never = |values: &[f64]| -> FracDiffResult<StationarityReport> {
        Ok(StationarityReport {
            statistic: 0.0,
            p_value: 0.99,
            observations: values.len(),
            used_lag: 1,
            critical_values: mackinnon_critical_values(values.len()),
        })
    };
    let frame = Frame::from_series(Series::from_values((1..=30).map(|v| v as f64).collect()));
    let config = FracDiffConfig::minimum_order(SearchConfig::default());
    let transformer = FracDiffTransformer::with_test(config, never).unwrap();

    let (out, report) = transformer.transform_with_report(&frame).unwrap();
    assert_eq!(report.non_stationary_columns(), vec!["0"]);
    assert_eq!(report.column("0").unwrap().order, 1.0);
    assert_eq!(out.column("0_fd").unwrap().len(), 28);
}

#[test]
fn test_stationarity_errors_propagate_through_search() {
    let broken = |_: &[f64]| -> FracDiffResult<StationarityReport> {
        Err(FracDiffError::StatisticalTestError {
            test_name: "broken".to_string(),
            reason: "no data source".to_string(),
        })
    };
    let series = Series::from_values((0..40).map(|v| v as f64 * 1.5).collect());
    let result = find_minimum_order(
        &series,
        &SearchConfig::default(),
        WindowMethod::Fixed,
        1e-2,
        &broken,
    );
    assert!(matches!(
        result,
        Err(FracDiffError::StatisticalTestError { .. })
    ));
}

#[test]
fn test_adf_input_limits() {
    // five points is below the lag-1 minimum
    assert!(matches!(
        augmented_dickey_fuller(&[1.0, 2.0, 4.0, 3.0, 5.0]),
        Err(FracDiffError::InsufficientData {
            required: 6,
            actual: 5
        })
    ));

    // a constant series has no statistic and never rejects
    let report = augmented_dickey_fuller(&[4.2; 60]).unwrap();
    assert!(report.statistic.is_nan());
    assert!(!report.rejects_unit_root(ConfidenceLevel::TenPercent));
}

#[test]
fn test_duplicate_column_names_rejected() {
    let result = Frame::from_columns(vec![
        ("x", Series::from_values(vec![1.0, 2.0])),
        ("x", Series::from_values(vec![3.0, 4.0])),
    ]);
    match result {
        Err(FracDiffError::DuplicateColumn { name }) => assert_eq!(name, "x"),
        other => panic!("expected DuplicateColumn, got {:?}", other),
    }
}

#[test]
fn test_malformed_index_rejected() {
    assert!(matches!(
        Series::new(vec![1, 2, 2], vec![0.0, 1.0, 2.0]),
        Err(FracDiffError::InvalidIndex { .. })
    ));
    assert!(matches!(
        Series::new(vec![3, 1], vec![0.0, 1.0]),
        Err(FracDiffError::InvalidIndex { .. })
    ));
    assert!(matches!(
        Series::new(vec![1, 2, 3], vec![0.0, 1.0]),
        Err(FracDiffError::InvalidIndex { .. })
    ));
}

#[test]
fn test_error_messages_are_descriptive() {
    let error = FracDiffError::SearchExhausted {
        lower: 0.0,
        upper: 1.0,
        last_order: 1.0,
    };
    let message = error.to_string();
    assert!(message.contains("0"));
    assert!(message.contains("1"));

    let error = FracDiffError::DuplicateColumn {
        name: "close".to_string(),
    };
    assert!(error.to_string().contains("close"));
}
