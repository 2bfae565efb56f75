//! TrendCast Core: series selection and linear trend projection.
//!
//! This crate contains the computational kernel:
//! - Domain types (observations, series, datasets, projections)
//! - Series selector (explicit names, aggregate-all, top-N, bottom-N)
//! - Trend projector (closed-form OLS on the period index, tail + horizon)
//! - Summary statistics and a hold-out accuracy diagnostic
//!
//! Everything here is pure and in-memory. Loading files, configuration and
//! output formats live in `trendcast-runner`.

pub mod domain;
pub mod error;
pub mod holdout;
pub mod projector;
pub mod selector;
pub mod stats;

pub use domain::{
    Dataset, Observation, PointKind, ProjectionParams, ProjectionPoint, ProjectionResult, Row,
    Series, TrendModel,
};
pub use error::TrendError;
pub use holdout::{evaluate_holdout, HoldoutConfig, HoldoutReport};
pub use projector::{fit, project, project_with};
pub use selector::{resolve, SelectionMode, SelectorColumns};
pub use stats::{year_over_year, PeriodChange, SeriesSummary};
