//! Dataset: homogeneous rows with categorical labels and numeric values.
//!
//! Rows keep their source order. The selector relies on that order for
//! stable tie-breaking when ranking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One record of a statistical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub period: i32,
    pub labels: BTreeMap<String, String>,
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new(period: i32) -> Self {
        Self {
            period,
            labels: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style label setter.
    pub fn with_label(mut self, column: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(column.into(), label.into());
        self
    }

    /// Builder-style value setter.
    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn label(&self, column: &str) -> Option<&str> {
        self.labels.get(column).map(|s| s.as_str())
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// An in-memory table of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct labels of `column`, in order of first appearance.
    pub fn groups(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.label(column))
            .filter(|label| seen.insert(*label))
            .map(String::from)
            .collect()
    }

    /// Distinct periods, ascending.
    pub fn periods(&self) -> Vec<i32> {
        self.rows
            .iter()
            .map(|row| row.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Latest period present, if any.
    pub fn latest_period(&self) -> Option<i32> {
        self.rows.iter().map(|row| row.period).max()
    }

    /// Rows whose period equals `period`, in source order.
    pub fn rows_at(&self, period: i32) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| row.period == period)
    }

    /// `(group, period)` pairs that occur more than once.
    pub fn duplicate_keys(&self, group_column: &str) -> Vec<(String, i32)> {
        let mut seen = HashSet::new();
        let mut reported = BTreeSet::new();
        for row in &self.rows {
            if let Some(label) = row.label(group_column) {
                if !seen.insert((label, row.period)) {
                    reported.insert((label.to_string(), row.period));
                }
            }
        }
        reported.into_iter().collect()
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
