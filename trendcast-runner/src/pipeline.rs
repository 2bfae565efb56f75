//! Dashboard pipeline: selection, projection and summaries for one request.
//!
//! A failing series never aborts the dashboard: `InsufficientData` and
//! `DegenerateInput` are recorded as skipped entries and the remaining
//! series are still projected. Only an empty selection fails the whole run,
//! and callers are expected to treat that as "nothing to show".

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trendcast_core::domain::{Dataset, ProjectionParams, ProjectionResult, Series};
use trendcast_core::error::TrendError;
use trendcast_core::holdout::{evaluate_holdout, HoldoutConfig, HoldoutReport};
use trendcast_core::projector::project_with;
use trendcast_core::selector::{all_groups, resolve, SelectionMode};
use trendcast_core::stats::{year_over_year, PeriodChange, SeriesSummary};

use crate::config::DashboardConfig;

/// Errors that stop a dashboard run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("selection resolved to no series")]
    EmptySelection,
}

/// What to show on one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub mode: SelectionMode,
    /// Ranking period for top/bottom modes; latest period when `None`.
    pub ranking_period: Option<i32>,
    pub params: ProjectionParams,
    pub parallel: bool,
    /// Run the hold-out diagnostic per projected series.
    pub holdout: Option<HoldoutConfig>,
}

impl DashboardRequest {
    pub fn new(mode: SelectionMode, params: ProjectionParams) -> Self {
        Self {
            mode,
            ranking_period: None,
            params,
            parallel: true,
            holdout: None,
        }
    }

    pub fn with_ranking_period(mut self, period: Option<i32>) -> Self {
        self.ranking_period = period;
        self
    }

    /// Enables or disables parallel projection.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_holdout(mut self, holdout: Option<HoldoutConfig>) -> Self {
        self.holdout = holdout;
        self
    }
}

/// Result of projecting one selected series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesOutcome {
    Projected(ProjectionResult),
    Skipped { reason: TrendError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntry {
    pub series: String,
    pub outcome: SeriesOutcome,
}

/// Per-series outcomes in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    pub entries: Vec<ProjectionEntry>,
}

impl ProjectionSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, series: &str) -> Option<&SeriesOutcome> {
        self.entries
            .iter()
            .find(|e| e.series == series)
            .map(|e| &e.outcome)
    }

    pub fn projected(&self) -> impl Iterator<Item = &ProjectionResult> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            SeriesOutcome::Projected(result) => Some(result),
            SeriesOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &TrendError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            SeriesOutcome::Skipped { reason } => Some((e.series.as_str(), reason)),
            SeriesOutcome::Projected(_) => None,
        })
    }
}

/// Year-over-year changes for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesChanges {
    pub series: String,
    pub changes: Vec<PeriodChange>,
}

/// Everything a renderer needs for one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub dashboard: String,
    pub title: String,
    pub unit: String,
    pub mode: SelectionMode,
    /// Period used for ranking; only set for top/bottom modes.
    pub ranking_period: Option<i32>,
    /// Observed series to chart. For aggregate-all this is every group plus
    /// the aggregate; otherwise the selected series.
    pub history: Vec<Series>,
    pub projections: ProjectionSet,
    pub summaries: Vec<SeriesSummary>,
    pub changes: Vec<SeriesChanges>,
    pub holdout: Vec<HoldoutReport>,
}

impl DashboardReport {
    /// Number of series carrying a projection.
    pub fn projected_count(&self) -> usize {
        self.projections.projected().count()
    }
}

/// Run one dashboard request against `dataset`.
pub fn run_dashboard(
    dataset: &Dataset,
    config: &DashboardConfig,
    request: &DashboardRequest,
) -> Result<DashboardReport, PipelineError> {
    let columns = config.selector_columns();
    // resolve has no failure mode other than an empty selection
    let selected = resolve(dataset, &columns, &request.mode, request.ranking_period)
        .map_err(|_| PipelineError::EmptySelection)?;
    info!(
        "{}: {} series selected ({:?})",
        config.name,
        selected.len(),
        request.mode
    );

    let ranking_period = match request.mode {
        SelectionMode::TopN(_) | SelectionMode::BottomN(_) => {
            request.ranking_period.or_else(|| dataset.latest_period())
        }
        SelectionMode::Explicit(_) | SelectionMode::AggregateAll => None,
    };

    let outcomes: Vec<Result<ProjectionResult, TrendError>> = if request.parallel {
        selected
            .par_iter()
            .map(|s| project_with(s, &request.params))
            .collect()
    } else {
        selected
            .iter()
            .map(|s| project_with(s, &request.params))
            .collect()
    };

    let mut entries = Vec::with_capacity(selected.len());
    for (series, outcome) in selected.iter().zip(outcomes) {
        let outcome = match outcome {
            Ok(result) => SeriesOutcome::Projected(result),
            Err(reason) => {
                warn!("{}: skipping '{}': {reason}", config.name, series.name());
                SeriesOutcome::Skipped { reason }
            }
        };
        entries.push(ProjectionEntry {
            series: series.name().to_string(),
            outcome,
        });
    }
    let projections = ProjectionSet { entries };

    let summaries = selected.iter().filter_map(SeriesSummary::of).collect();
    let changes = selected
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| SeriesChanges {
            series: s.name().to_string(),
            changes: year_over_year(s),
        })
        .collect();

    let holdout = match &request.holdout {
        Some(holdout_config) => selected
            .iter()
            .filter(|s| matches!(projections.get(s.name()), Some(SeriesOutcome::Projected(_))))
            .filter_map(|s| match evaluate_holdout(s, holdout_config) {
                Ok(report) => Some(report),
                Err(e) => {
                    debug!("holdout skipped for '{}': {e}", s.name());
                    None
                }
            })
            .collect(),
        None => Vec::new(),
    };

    let history = match request.mode {
        SelectionMode::AggregateAll => {
            let mut groups = all_groups(dataset, &columns);
            groups.extend(selected);
            groups
        }
        _ => selected,
    };

    info!(
        "{}: {} projected, {} skipped",
        config.name,
        projections.projected().count(),
        projections.skipped().count()
    );

    Ok(DashboardReport {
        dashboard: config.name.clone(),
        title: config.title.clone(),
        unit: config.unit.clone(),
        mode: request.mode.clone(),
        ranking_period,
        history,
        projections,
        summaries,
        changes,
        holdout,
    })
}
