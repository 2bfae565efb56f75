//! Series: a named, period-ordered run of observations.

use serde::{Deserialize, Serialize};

/// A single `(period, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(period: i32, value: f64) -> Self {
        Self { period, value }
    }
}

/// Named series of observations, ascending by period.
///
/// Periods are expected to be unique; see [`Series::has_duplicate_periods`].
///
/// Series are read-only once built. Derived series (aggregates, filtered
/// subsets) are new values, never edits of an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    observations: Vec<Observation>,
}

impl Series {
    /// A series with no observations.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observations: Vec::new(),
        }
    }

    /// Build a series from observations in any order.
    ///
    /// Observations are stably sorted by period. Period uniqueness is a
    /// precondition of the input table; ingestion reports violations.
    pub fn new(name: impl Into<String>, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.period);
        Self {
            name: name.into(),
            observations,
        }
    }

    /// Build a series from `(period, value)` pairs in any order.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(i32, f64)]) -> Self {
        let observations = pairs
            .iter()
            .map(|&(period, value)| Observation::new(period, value))
            .collect();
        Self::new(name, observations)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest period, if any.
    pub fn first_period(&self) -> Option<i32> {
        self.observations.first().map(|o| o.period)
    }

    /// Latest period, if any.
    pub fn last_period(&self) -> Option<i32> {
        self.observations.last().map(|o| o.period)
    }

    /// Observed value at `period`.
    pub fn value_at(&self, period: i32) -> Option<f64> {
        self.observations
            .binary_search_by_key(&period, |o| o.period)
            .ok()
            .map(|idx| self.observations[idx].value)
    }

    pub fn periods(&self) -> impl Iterator<Item = i32> + '_ {
        self.observations.iter().map(|o| o.period)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.value)
    }

    /// True if two observations share a period.
    pub fn has_duplicate_periods(&self) -> bool {
        self.observations
            .windows(2)
            .any(|w| w[0].period == w[1].period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_period() {
        let s = Series::from_pairs("Aceh", &[(2022, 3.0), (2020, 1.0), (2021, 2.0)]);
        let periods: Vec<i32> = s.periods().collect();
        assert_eq!(periods, vec![2020, 2021, 2022]);
        assert_eq!(s.first_period(), Some(2020));
        assert_eq!(s.last_period(), Some(2022));
    }

    #[test]
    fn duplicate_periods_are_kept_in_input_order() {
        let s = Series::from_pairs("Aceh", &[(2021, 4.0), (2020, 1.0), (2020, 3.0)]);
        assert_eq!(s.len(), 3);
        assert!(s.has_duplicate_periods());
        let values: Vec<f64> = s.values().collect();
        assert_eq!(values, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn unique_periods_are_not_duplicates() {
        let s = Series::from_pairs("Aceh", &[(2020, 1.0), (2021, 2.0)]);
        assert!(!s.has_duplicate_periods());
    }

    #[test]
    fn value_at_missing_period() {
        let s = Series::from_pairs("Aceh", &[(2020, 1.0), (2022, 2.0)]);
        assert_eq!(s.value_at(2021), None);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        let s = Series::empty("Simeulue");
        assert!(s.is_empty());
        assert_eq!(s.name(), "Simeulue");
        assert_eq!(s.first_period(), None);
        assert_eq!(s.last_period(), None);
    }
}
