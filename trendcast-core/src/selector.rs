//! Series selector: turns a selection directive into concrete series.
//!
//! A directive is one of four modes:
//! - `Explicit`: the caller names the groups
//! - `AggregateAll`: one synthetic series, the per-period mean across all rows
//! - `TopN` / `BottomN`: the groups ranked highest / lowest at a ranking period
//!
//! Ranking is a stable sort, so ties keep dataset row order.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, Observation, Series, SeriesName};
use crate::error::TrendError;

/// How the caller wants series resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "arg", rename_all = "snake_case")]
pub enum SelectionMode {
    Explicit(Vec<SeriesName>),
    AggregateAll,
    TopN(usize),
    BottomN(usize),
}

/// Which dataset columns the selector reads, plus the aggregate series name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorColumns {
    pub group_column: String,
    pub value_column: String,
    pub aggregate_label: String,
}

impl SelectorColumns {
    pub fn new(
        group_column: impl Into<String>,
        value_column: impl Into<String>,
        aggregate_label: impl Into<String>,
    ) -> Self {
        Self {
            group_column: group_column.into(),
            value_column: value_column.into(),
            aggregate_label: aggregate_label.into(),
        }
    }
}

/// Resolve `mode` against `dataset` into an ordered list of series.
///
/// `ranking_period` only matters for `TopN`/`BottomN` and defaults to the
/// latest period in the dataset. Fails with [`TrendError::EmptySelection`]
/// when no series name is resolved.
pub fn resolve(
    dataset: &Dataset,
    columns: &SelectorColumns,
    mode: &SelectionMode,
    ranking_period: Option<i32>,
) -> Result<Vec<Series>, TrendError> {
    let names = match mode {
        SelectionMode::Explicit(names) => dedup_in_order(names.iter().cloned()),
        SelectionMode::AggregateAll => {
            return aggregate_all(dataset, columns).map(|series| vec![series]);
        }
        SelectionMode::TopN(k) => ranked_groups(dataset, columns, *k, ranking_period, Rank::Top),
        SelectionMode::BottomN(k) => {
            ranked_groups(dataset, columns, *k, ranking_period, Rank::Bottom)
        }
    };

    if names.is_empty() {
        return Err(TrendError::EmptySelection);
    }
    debug!("selection resolved to {} series: {:?}", names.len(), names);

    Ok(names
        .iter()
        .map(|name| series_for(dataset, columns, name))
        .collect())
}

/// Every group in the dataset as a series, in first-appearance order.
pub fn all_groups(dataset: &Dataset, columns: &SelectorColumns) -> Vec<Series> {
    dataset
        .groups(&columns.group_column)
        .iter()
        .map(|name| series_for(dataset, columns, name))
        .collect()
}

/// The series of one group. A group without rows yields an empty series.
pub fn series_for(dataset: &Dataset, columns: &SelectorColumns, name: &str) -> Series {
    let observations = dataset
        .rows()
        .iter()
        .filter(|row| row.label(&columns.group_column) == Some(name))
        .filter_map(|row| {
            row.value(&columns.value_column)
                .map(|value| Observation::new(row.period, value))
        })
        .collect();
    Series::new(name, observations)
}

/// Per-period mean of the value column across every row, regardless of group.
pub fn aggregate_all(dataset: &Dataset, columns: &SelectorColumns) -> Result<Series, TrendError> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for row in dataset.rows() {
        if let Some(value) = row.value(&columns.value_column) {
            let entry = sums.entry(row.period).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    if sums.is_empty() {
        return Err(TrendError::EmptySelection);
    }

    let observations = sums
        .into_iter()
        .map(|(period, (sum, count))| Observation::new(period, sum / count as f64))
        .collect();
    Ok(Series::new(columns.aggregate_label.clone(), observations))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Top,
    Bottom,
}

fn ranked_groups(
    dataset: &Dataset,
    columns: &SelectorColumns,
    k: usize,
    ranking_period: Option<i32>,
    rank: Rank,
) -> Vec<SeriesName> {
    let Some(period) = ranking_period.or_else(|| dataset.latest_period()) else {
        return Vec::new();
    };

    let mut candidates: Vec<(&str, f64)> = dataset
        .rows_at(period)
        .filter_map(|row| {
            let label = row.label(&columns.group_column)?;
            let value = row.value(&columns.value_column)?;
            Some((label, value))
        })
        .collect();

    // sort_by is stable: equal values keep row order
    match rank {
        Rank::Top => candidates.sort_by(|a, b| b.1.total_cmp(&a.1)),
        Rank::Bottom => candidates.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }

    let mut names = dedup_in_order(candidates.into_iter().map(|(label, _)| label.to_string()));
    names.truncate(k);
    names
}

fn dedup_in_order(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.filter(|name| seen.insert(name.clone())).collect()
}
