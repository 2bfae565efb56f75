//! Domain types for TrendCast

pub mod dataset;
pub mod projection;
pub mod series;

pub use dataset::{Dataset, Row};
pub use projection::{PointKind, ProjectionParams, ProjectionPoint, ProjectionResult, TrendModel};
pub use series::{Observation, Series};

/// Name of a series (a region, province or sector label).
pub type SeriesName = String;
