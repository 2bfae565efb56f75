//! TrendCast Runner: dashboard orchestration on top of `trendcast-core`.
//!
//! This crate provides:
//! - Dashboard configs and the built-in regional presets
//! - CSV ingestion with header normalization and dataset fingerprinting
//! - The dashboard pipeline (select, project, summarize, hold-out diagnostic)
//! - JSON/CSV report export with a provenance manifest

pub mod config;
pub mod export;
pub mod ingest;
pub mod pipeline;

pub use config::{ConfigError, DashboardConfig, Preset, ProjectionSection};
pub use export::{save_report, write_points_csv, write_report_json, ArtifactPaths, ReportManifest};
pub use ingest::{load_csv, read_csv, IngestError, LoadedDataset};
pub use pipeline::{
    run_dashboard, DashboardReport, DashboardRequest, PipelineError, ProjectionEntry,
    ProjectionSet, SeriesChanges, SeriesOutcome,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<DashboardReport>();
        assert_sync::<DashboardReport>();
        assert_send::<DashboardConfig>();
        assert_sync::<DashboardConfig>();
        assert_send::<LoadedDataset>();
        assert_sync::<LoadedDataset>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
        assert_send::<IngestError>();
        assert_sync::<IngestError>();
    }
}
