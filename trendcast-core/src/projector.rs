//! Trend projector: ordinary least squares on the period index.
//!
//! The line is fitted over the whole history of a series with the
//! closed-form single-predictor solution:
//!
//! ```text
//! slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / n
//! ```
//!
//! A projection is the observed tail of the series followed by the fitted
//! line extrapolated over the horizon.

use log::debug;

use crate::domain::{
    PointKind, ProjectionParams, ProjectionPoint, ProjectionResult, Series, TrendModel,
};
use crate::error::TrendError;

/// Fewest observations a line can be fitted through.
pub const MIN_OBSERVATIONS: usize = 2;

/// Fit a least-squares line through every observation of `series`.
///
/// # Errors
///
/// - [`TrendError::InsufficientData`] with fewer than two observations
/// - [`TrendError::DegenerateInput`] when every observation shares one period
pub fn fit(series: &Series) -> Result<TrendModel, TrendError> {
    let obs = series.observations();
    if obs.len() < MIN_OBSERVATIONS {
        return Err(insufficient(series));
    }

    let first_period = obs[0].period;
    if obs.iter().all(|o| o.period == first_period) {
        return Err(TrendError::DegenerateInput {
            series: series.name().to_string(),
            period: first_period,
        });
    }

    let n = obs.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_x2, mut sum_xy) = (0.0, 0.0, 0.0, 0.0);
    for o in obs {
        let x = f64::from(o.period);
        sum_x += x;
        sum_y += o.value;
        sum_x2 += x * x;
        sum_xy += x * o.value;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(TrendError::DegenerateInput {
            series: series.name().to_string(),
            period: first_period,
        });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = obs.iter().map(|o| (o.value - mean_y).powi(2)).sum();
    let ss_res: f64 = obs
        .iter()
        .map(|o| (o.value - (slope * f64::from(o.period) + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    debug!(
        "fitted '{}': slope={slope:.6} intercept={intercept:.6} r2={r_squared:.4} n={}",
        series.name(),
        obs.len()
    );

    Ok(TrendModel {
        slope,
        intercept,
        n_observations: obs.len(),
        r_squared,
    })
}

/// Observed tail plus `horizon` forecast periods for `series`.
///
/// The tail covers periods `last - history_tail + 1 ..= last` that actually
/// exist in the series, with their observed values. Forecast periods start
/// strictly after the last observed period.
pub fn project(
    series: &Series,
    history_tail: usize,
    horizon: usize,
) -> Result<ProjectionResult, TrendError> {
    let model = fit(series)?;
    let last_period = series
        .last_period()
        .ok_or_else(|| insufficient(series))?;

    // windows wider than i64 saturate to "everything up to last_period"
    let window = i64::try_from(history_tail).unwrap_or(i64::MAX);
    let tail_start = i64::from(last_period).saturating_sub(window).saturating_add(1);

    let mut points: Vec<ProjectionPoint> = series
        .observations()
        .iter()
        .filter(|o| history_tail > 0 && i64::from(o.period) >= tail_start)
        .map(|o| ProjectionPoint {
            period: o.period,
            value: o.value,
            kind: PointKind::Observed,
        })
        .collect();

    points.extend((1..=horizon).map_while(|step| {
        let period = last_period.checked_add(i32::try_from(step).ok()?)?;
        Some(ProjectionPoint {
            period,
            value: model.predict(period),
            kind: PointKind::Forecast,
        })
    }));

    Ok(ProjectionResult {
        series: series.name().to_string(),
        model,
        points,
    })
}

/// [`project`] with window sizes bundled as [`ProjectionParams`].
pub fn project_with(
    series: &Series,
    params: &ProjectionParams,
) -> Result<ProjectionResult, TrendError> {
    project(series, params.history_tail, params.horizon)
}

fn insufficient(series: &Series) -> TrendError {
    TrendError::InsufficientData {
        series: series.name().to_string(),
        required: MIN_OBSERVATIONS,
        actual: series.len(),
    }
}
