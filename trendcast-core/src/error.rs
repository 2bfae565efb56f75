//! Error kinds surfaced by selection and trend fitting.
//!
//! Every variant is a recoverable, expected outcome. Callers skip the
//! affected series (or the whole analysis for `EmptySelection`) and carry on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the selector and the projector.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendError {
    /// The selection resolved to zero series names.
    #[error("selection resolved to no series")]
    EmptySelection,

    /// Too few observations to fit a line.
    #[error("series '{series}' has {actual} observation(s), need at least {required}")]
    InsufficientData {
        series: String,
        required: usize,
        actual: usize,
    },

    /// Every observation shares the same period, so the slope is undefined.
    #[error("series '{series}' has zero variance in period (all observations at {period})")]
    DegenerateInput { series: String, period: i32 },
}

impl TrendError {
    /// True for errors that only concern a single series.
    pub fn is_per_series(&self) -> bool {
        matches!(
            self,
            TrendError::InsufficientData { .. } | TrendError::DegenerateInput { .. }
        )
    }
}
