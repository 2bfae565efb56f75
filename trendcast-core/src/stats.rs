//! Summary statistics over a single series.
//!
//! Pure functions, series in, numbers out. Used for the textual summaries
//! that accompany each chart (mean of series, year-over-year change).

use serde::{Deserialize, Serialize};

use crate::domain::Series;

/// Descriptive statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub series: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub first_period: i32,
    pub last_period: i32,
    pub last_value: f64,
}

impl SeriesSummary {
    /// Summarize `series`; `None` when it has no observations.
    pub fn of(series: &Series) -> Option<Self> {
        let first = series.observations().first()?;
        let last = series.observations().last()?;
        let count = series.len();

        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in series.values() {
            min = min.min(v);
            max = max.max(v);
        }

        Some(Self {
            series: series.name().to_string(),
            count,
            mean: mean(series)?,
            min,
            max,
            first_period: first.period,
            last_period: last.period,
            last_value: last.value,
        })
    }
}

/// Arithmetic mean of the series values.
pub fn mean(series: &Series) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(series.values().sum::<f64>() / series.len() as f64)
}

/// Change from the previous observation, per period.
///
/// The first observation has no predecessor and yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub period: i32,
    pub value: f64,
    pub change: Option<f64>,
}

/// Period-over-period differences (for yearly data, year-over-year).
pub fn year_over_year(series: &Series) -> Vec<PeriodChange> {
    let mut previous: Option<f64> = None;
    series
        .observations()
        .iter()
        .map(|o| {
            let change = previous.map(|p| o.value - p);
            previous = Some(o.value);
            PeriodChange {
                period: o.period,
                value: o.value,
                change,
            }
        })
        .collect()
}
