//! Report export: JSON report, projection points CSV, and run manifest.
//!
//! `save_report` lays artifacts out per dashboard:
//! - `<dashboard>/report.json`: the full [`DashboardReport`]
//! - `<dashboard>/points.csv`: one row per projection point
//! - `<dashboard>/manifest.json`: provenance (dataset fingerprint, timestamp)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::pipeline::DashboardReport;

/// Version of the manifest layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Provenance record written next to every saved report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub schema_version: u32,
    pub dashboard: String,
    pub dataset_fingerprint: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub crate_version: String,
    pub series_count: usize,
    pub projected_count: usize,
}

impl ReportManifest {
    pub fn for_report(report: &DashboardReport, dataset_fingerprint: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dashboard: report.dashboard.clone(),
            dataset_fingerprint: dataset_fingerprint.to_string(),
            generated_at: chrono::Utc::now(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            series_count: report.projections.len(),
            projected_count: report.projected_count(),
        }
    }
}

/// Paths of the artifacts written by [`save_report`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub report_json: PathBuf,
    pub points_csv: PathBuf,
    pub manifest: PathBuf,
}

/// Serialize a report to pretty JSON.
pub fn export_json(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize DashboardReport to JSON")
}

pub fn write_report_json(path: &Path, report: &DashboardReport) -> Result<()> {
    let json = export_json(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

/// Render every projection point as CSV.
///
/// Columns: series, period, value, kind. Skipped series contribute no rows.
pub fn export_points_csv(report: &DashboardReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["series", "period", "value", "kind"])?;

    for result in report.projections.projected() {
        for p in &result.points {
            let period = p.period.to_string();
            let value = format!("{:.6}", p.value);
            wtr.write_record([
                result.series.as_str(),
                period.as_str(),
                value.as_str(),
                p.kind.as_str(),
            ])?;
        }
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub fn write_points_csv(path: &Path, report: &DashboardReport) -> Result<()> {
    let csv = export_points_csv(report)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write points to {}", path.display()))
}

pub fn write_manifest(path: &Path, manifest: &ReportManifest) -> Result<()> {
    let json =
        serde_json::to_string_pretty(manifest).context("failed to serialize report manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write manifest to {}", path.display()))
}

/// Read a manifest back, rejecting layouts newer than this build understands.
pub fn read_manifest(path: &Path) -> Result<ReportManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest: ReportManifest =
        serde_json::from_str(&json).context("failed to deserialize report manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

/// Write all artifacts for `report` under `output_dir/<dashboard>/`.
pub fn save_report(
    report: &DashboardReport,
    output_dir: &Path,
    dataset_fingerprint: &str,
) -> Result<ArtifactPaths> {
    let dir = output_dir.join(&report.dashboard);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact directory {}", dir.display()))?;

    let report_json = dir.join("report.json");
    write_report_json(&report_json, report)?;

    let points_csv = dir.join("points.csv");
    write_points_csv(&points_csv, report)?;

    let manifest = dir.join("manifest.json");
    write_manifest(&manifest, &ReportManifest::for_report(report, dataset_fingerprint))?;

    info!("saved {} artifacts to {}", report.dashboard, dir.display());
    Ok(ArtifactPaths {
        report_json,
        points_csv,
        manifest,
    })
}
