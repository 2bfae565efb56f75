//! End-to-end tests: dataset → selector → projector.
//!
//! Tests:
//! 1. Six-year series projected with tail 2, horizon 5 gives 7 points.
//! 2. Aggregate-all series projects like any other series.
//! 3. Per-series failures do not affect siblings.
//! 4. Explicit selection of an unknown group fails at projection, not selection.

use trendcast_core::domain::{Dataset, PointKind, Row};
use trendcast_core::error::TrendError;
use trendcast_core::projector::project;
use trendcast_core::selector::{resolve, SelectionMode, SelectorColumns};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn columns() -> SelectorColumns {
    SelectorColumns::new("region", "value", "Average of all regions")
}

/// Three regions over 2018..2023 plus one region with a single year.
fn regional_dataset() -> Dataset {
    let mut rows = Vec::new();
    for (i, year) in (2018..=2023).enumerate() {
        let t = i as f64;
        rows.push(
            Row::new(year)
                .with_label("region", "Banda Aceh")
                .with_value("value", 60.0 + 2.0 * t),
        );
        rows.push(
            Row::new(year)
                .with_label("region", "Aceh Besar")
                .with_value("value", 30.0 + 1.0 * t),
        );
        rows.push(
            Row::new(year)
                .with_label("region", "Sabang")
                .with_value("value", 45.0 - 0.5 * t),
        );
    }
    rows.push(
        Row::new(2023)
            .with_label("region", "Pidie Jaya")
            .with_value("value", 25.0),
    );
    Dataset::new(rows)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[test]
fn six_year_series_gives_seven_points() {
    let ds = regional_dataset();
    let mode = SelectionMode::Explicit(vec!["Banda Aceh".into()]);
    let series = resolve(&ds, &columns(), &mode, None).unwrap();
    let r = project(&series[0], 2, 5).unwrap();

    assert_eq!(r.points.len(), 7);
    assert_eq!(r.points[0].period, 2022);
    assert_eq!(r.points[0].value, 68.0);
    assert_eq!(r.points[0].kind, PointKind::Observed);
    assert_eq!(r.points[1].period, 2023);
    assert_eq!(r.points[1].value, 70.0);
    assert_eq!(r.points[1].kind, PointKind::Observed);

    for (i, p) in r.points[2..].iter().enumerate() {
        assert_eq!(p.period, 2024 + i as i32);
        assert_eq!(p.kind, PointKind::Forecast);
        let expected = 60.0 + 2.0 * f64::from(p.period - 2018);
        assert!((p.value - expected).abs() < 1e-6, "{} vs {}", p.value, expected);
    }
}

#[test]
fn aggregate_series_is_projected() {
    let ds = regional_dataset();
    let series = resolve(&ds, &columns(), &SelectionMode::AggregateAll, None).unwrap();
    assert_eq!(series.len(), 1);
    let avg = &series[0];
    assert_eq!(avg.name(), "Average of all regions");
    assert_eq!(avg.len(), 6);
    // 2018: (60 + 30 + 45) / 3
    assert_eq!(avg.value_at(2018), Some(45.0));
    // 2023 includes the single-year region: (70 + 35 + 42.5 + 25) / 4
    assert_eq!(avg.value_at(2023), Some(43.125));

    let r = project(avg, 2, 5).unwrap();
    assert_eq!(r.series, "Average of all regions");
    assert_eq!(r.forecast().count(), 5);
}

#[test]
fn failing_series_do_not_affect_siblings() {
    let ds = regional_dataset();
    let mode = SelectionMode::Explicit(vec![
        "Pidie Jaya".into(),
        "Sabang".into(),
        "Aceh Besar".into(),
    ]);
    let series = resolve(&ds, &columns(), &mode, None).unwrap();
    let results: Vec<_> = series.iter().map(|s| project(s, 2, 5)).collect();

    assert!(matches!(
        results[0],
        Err(TrendError::InsufficientData { actual: 1, .. })
    ));
    assert!(results[1].is_ok());
    assert!(results[2].is_ok());
}

#[test]
fn top_three_by_latest_year() {
    let ds = regional_dataset();
    let series = resolve(&ds, &columns(), &SelectionMode::TopN(3), None).unwrap();
    let names: Vec<&str> = series.iter().map(|s| s.name()).collect();
    // 2023: Banda Aceh 70, Sabang 42.5, Aceh Besar 35, Pidie Jaya 25
    assert_eq!(names, vec!["Banda Aceh", "Sabang", "Aceh Besar"]);
}

#[test]
fn bottom_two_by_earlier_year() {
    let ds = regional_dataset();
    let series = resolve(&ds, &columns(), &SelectionMode::BottomN(2), Some(2018)).unwrap();
    let names: Vec<&str> = series.iter().map(|s| s.name()).collect();
    // Pidie Jaya has no 2018 row
    assert_eq!(names, vec!["Aceh Besar", "Sabang"]);
}

#[test]
fn unknown_group_is_insufficient_data_not_empty_selection() {
    let ds = regional_dataset();
    let series = resolve(&ds, &columns(), &SelectionMode::Explicit(vec!["X".into()]), None)
        .expect("explicit names always resolve");
    assert_eq!(series[0].len(), 0);
    let err = project(&series[0], 2, 5).unwrap_err();
    assert_eq!(
        err,
        TrendError::InsufficientData {
            series: "X".into(),
            required: 2,
            actual: 0
        }
    );
}

#[test]
fn projection_is_bit_identical_across_calls() {
    let ds = regional_dataset();
    let series = resolve(&ds, &columns(), &SelectionMode::AggregateAll, None).unwrap();
    let a = project(&series[0], 2, 5).unwrap();
    let b = project(&series[0], 2, 5).unwrap();
    assert_eq!(a, b);
}
