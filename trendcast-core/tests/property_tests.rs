//! Property tests for projector and selector invariants.
//!
//! Uses proptest to verify:
//! 1. OLS optimality: nudging slope or intercept never lowers the residual sum of squares
//! 2. Exact lines are recovered
//! 3. Idempotence: projecting twice gives bit-identical results
//! 4. Projection shape: tail + horizon, ascending, observed values untouched
//! 5. Top/bottom disjointness: TopN and BottomN partition the ranked groups

use proptest::prelude::*;
use std::collections::HashSet;
use trendcast_core::domain::{Dataset, PointKind, Row, Series, TrendModel};
use trendcast_core::projector::{fit, project};
use trendcast_core::selector::{resolve, SelectionMode, SelectorColumns};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Series over consecutive years starting somewhere in 1990..2020.
fn arb_series() -> impl Strategy<Value = Series> {
    (1990..2020i32, prop::collection::vec(-1_000.0..1_000.0_f64, 2..30)).prop_map(
        |(start, values)| {
            let pairs: Vec<(i32, f64)> = values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (start + i as i32, (v * 100.0).round() / 100.0))
                .collect();
            Series::from_pairs("prop", &pairs)
        },
    )
}

fn rss(series: &Series, slope: f64, intercept: f64) -> f64 {
    series
        .observations()
        .iter()
        .map(|o| (o.value - (slope * f64::from(o.period) + intercept)).powi(2))
        .sum()
}

fn columns() -> SelectorColumns {
    SelectorColumns::new("group", "value", "all")
}

// ── 1. OLS optimality ────────────────────────────────────────────────

proptest! {
    #[test]
    fn fitted_line_minimizes_residuals(
        series in arb_series(),
        d_slope in -1.0..1.0_f64,
        d_intercept in -50.0..50.0_f64,
    ) {
        let m: TrendModel = fit(&series).unwrap();
        let best = rss(&series, m.slope, m.intercept);
        let nudged = rss(&series, m.slope + d_slope * 1e-3, m.intercept + d_intercept);
        // relative tolerance for floating-point noise in the optimum
        prop_assert!(best <= nudged + 1e-9 * (1.0 + best.abs()));
    }

    #[test]
    fn exact_lines_are_recovered(
        start in 1990..2020i32,
        len in 2..25usize,
        slope in -50.0..50.0_f64,
        intercept in -1_000.0..1_000.0_f64,
    ) {
        let pairs: Vec<(i32, f64)> = (0..len)
            .map(|i| {
                let p = start + i as i32;
                (p, slope * f64::from(p - start) + intercept)
            })
            .collect();
        let m = fit(&Series::from_pairs("line", &pairs)).unwrap();
        prop_assert!((m.slope - slope).abs() < 1e-6);
        prop_assert!((m.predict(start) - intercept).abs() < 1e-4);
    }
}

// ── 2. Idempotence and shape ─────────────────────────────────────────

proptest! {
    #[test]
    fn projection_is_idempotent(series in arb_series(), tail in 0..6usize, horizon in 0..8usize) {
        let a = project(&series, tail, horizon).unwrap();
        let b = project(&series, tail, horizon).unwrap();
        prop_assert_eq!(a.points.len(), b.points.len());
        for (x, y) in a.points.iter().zip(b.points.iter()) {
            prop_assert_eq!(x.period, y.period);
            prop_assert_eq!(x.value.to_bits(), y.value.to_bits());
            prop_assert_eq!(x.kind, y.kind);
        }
        prop_assert_eq!(a.model.slope.to_bits(), b.model.slope.to_bits());
        prop_assert_eq!(a.model.intercept.to_bits(), b.model.intercept.to_bits());
    }

    #[test]
    fn projection_shape(series in arb_series(), tail in 0..6usize, horizon in 0..8usize) {
        let r = project(&series, tail, horizon).unwrap();
        let last = series.last_period().unwrap();

        let observed: Vec<_> = r.points.iter().filter(|p| p.kind == PointKind::Observed).collect();
        let forecast: Vec<_> = r.points.iter().filter(|p| p.kind == PointKind::Forecast).collect();

        prop_assert_eq!(observed.len(), tail.min(series.len()));
        prop_assert_eq!(forecast.len(), horizon);
        prop_assert!(r.points.windows(2).all(|w| w[0].period < w[1].period));

        for p in &observed {
            prop_assert!(p.period <= last);
            prop_assert_eq!(Some(p.value), series.value_at(p.period));
        }
        for (i, p) in forecast.iter().enumerate() {
            prop_assert_eq!(p.period, last + 1 + i as i32);
        }
    }
}

// ── 3. Top / bottom partition ────────────────────────────────────────

proptest! {
    #[test]
    fn top_and_bottom_are_disjoint(
        values in prop::collection::hash_set(-1_000..1_000i32, 6..20),
        k in 1..4usize,
    ) {
        // distinct values, so ranking has no ties to break
        let ds: Dataset = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Row::new(2023)
                    .with_label("group", format!("G{i}"))
                    .with_value("value", f64::from(*v))
            })
            .collect();

        let top: HashSet<String> = resolve(&ds, &columns(), &SelectionMode::TopN(k), None)
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let bottom: HashSet<String> = resolve(&ds, &columns(), &SelectionMode::BottomN(k), None)
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();

        prop_assert_eq!(top.len(), k);
        prop_assert_eq!(bottom.len(), k);
        prop_assert!(top.is_disjoint(&bottom));

        let all: HashSet<String> = ds.groups("group").into_iter().collect();
        let middle: HashSet<String> = all
            .iter()
            .filter(|g| !top.contains(*g) && !bottom.contains(*g))
            .cloned()
            .collect();
        prop_assert_eq!(top.len() + bottom.len() + middle.len(), all.len());
    }
}
