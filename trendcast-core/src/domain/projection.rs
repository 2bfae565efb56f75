//! Fitted trend models and the projections built from them.

use serde::{Deserialize, Serialize};

/// Fitted least-squares line `value = slope * period + intercept` for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations the line was fitted on.
    pub n_observations: usize,
    /// Coefficient of determination over the fitted observations.
    pub r_squared: f64,
}

impl TrendModel {
    /// Value of the fitted line at `period`.
    pub fn predict(&self, period: i32) -> f64 {
        self.slope * f64::from(period) + self.intercept
    }
}

/// Whether a projected point is a real observation or an extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Observed,
    Forecast,
}

impl PointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointKind::Observed => "observed",
            PointKind::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period: i32,
    pub value: f64,
    pub kind: PointKind,
}

/// Window sizes for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// How many of the most recent observed periods to include.
    pub history_tail: usize,
    /// How many future periods to forecast.
    pub horizon: usize,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            history_tail: 2,
            horizon: 5,
        }
    }
}

/// Observed tail followed by the forecast horizon for one series.
///
/// Points are ascending by period and never repeat a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub series: String,
    pub model: TrendModel,
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionResult {
    pub fn observed(&self) -> impl Iterator<Item = &ProjectionPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Observed)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &ProjectionPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Forecast)
    }

    /// Last forecast point, if the horizon was non-empty.
    pub fn final_forecast(&self) -> Option<&ProjectionPoint> {
        self.forecast().last()
    }
}
