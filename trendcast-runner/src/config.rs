//! Dashboard configuration and built-in presets.
//!
//! A dashboard describes one statistical table: which source columns map to
//! the canonical group / period / value columns, the name of the synthetic
//! aggregate series, and the projection windows. Configs round-trip through
//! TOML so new tables can be added without code changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use trendcast_core::domain::ProjectionParams;
use trendcast_core::selector::SelectorColumns;

/// Errors from loading or validating a dashboard config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown preset '{0}' (valid: growth-rate, per-capita, sector-grdp)")]
    UnknownPreset(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Projection window settings as they appear in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSection {
    #[serde(default = "default_history_tail")]
    pub history_tail: usize,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
}

fn default_history_tail() -> usize {
    ProjectionParams::default().history_tail
}

fn default_horizon() -> usize {
    ProjectionParams::default().horizon
}

fn default_delimiter() -> String {
    ";".into()
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            history_tail: default_history_tail(),
            horizon: default_horizon(),
        }
    }
}

impl From<ProjectionSection> for ProjectionParams {
    fn from(s: ProjectionSection) -> Self {
        ProjectionParams {
            history_tail: s.history_tail,
            horizon: s.horizon,
        }
    }
}

/// Full description of one dashboard's table and analysis windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub name: String,
    pub title: String,
    pub group_column: String,
    pub period_column: String,
    pub value_column: String,
    pub aggregate_label: String,
    #[serde(default)]
    pub unit: String,
    /// Field delimiter of the source CSV.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Source column name → canonical column name.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    #[serde(default)]
    pub projection: ProjectionSection,
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("name", &self.name),
            ("group_column", &self.group_column),
            ("period_column", &self.period_column),
            ("value_column", &self.value_column),
            ("aggregate_label", &self.aggregate_label),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        let distinct = [&self.group_column, &self.period_column, &self.value_column];
        if distinct[0] == distinct[1] || distinct[0] == distinct[2] || distinct[1] == distinct[2] {
            return Err(ConfigError::Invalid(
                "group, period and value columns must be distinct".into(),
            ));
        }
        self.delimiter_byte()?;
        if self.projection.horizon == 0 {
            return Err(ConfigError::Invalid("projection.horizon must be at least 1".into()));
        }
        Ok(())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    /// Columns the selector reads.
    pub fn selector_columns(&self) -> SelectorColumns {
        SelectorColumns::new(
            self.group_column.clone(),
            self.value_column.clone(),
            self.aggregate_label.clone(),
        )
    }

    pub fn projection_params(&self) -> ProjectionParams {
        self.projection.into()
    }

    /// Canonical name for a (trimmed) source header.
    pub fn canonical_column<'a>(&'a self, header: &'a str) -> &'a str {
        self.rename.get(header).map(|s| s.as_str()).unwrap_or(header)
    }
}

/// The three regional tables the toolkit ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Provincial economic growth rate, percent per year.
    GrowthRate,
    /// Per-capita gross regional product by regency/city.
    PerCapita,
    /// Current-price gross regional product by business sector.
    SectorGrdp,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::GrowthRate, Preset::PerCapita, Preset::SectorGrdp];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::GrowthRate => "growth-rate",
            Preset::PerCapita => "per-capita",
            Preset::SectorGrdp => "sector-grdp",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// Build the dashboard config for this preset.
    pub fn config(&self) -> DashboardConfig {
        let (title, source_group, group, source_value, value, aggregate_label, unit) = match self {
            Preset::GrowthRate => (
                "Economic growth rate and 5-year projection",
                "bps_nama_provinsi",
                "province",
                "laju_pertumbuhan_ekonomi",
                "growth_rate",
                "Average of all provinces",
                "%",
            ),
            Preset::PerCapita => (
                "Per-capita GRDP by regency/city",
                "bps_nama_kabupaten_kota",
                "region",
                "nilai",
                "value",
                "Average of all regencies/cities",
                "million IDR",
            ),
            Preset::SectorGrdp => (
                "Current-price GRDP by business sector",
                "lapangan_usaha",
                "sector",
                "pdrb",
                "grdp",
                "Average of all sectors",
                "billion IDR",
            ),
        };

        let rename = [
            (source_group, group),
            (source_value, value),
            ("tahun", "year"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        DashboardConfig {
            name: self.name().to_string(),
            title: title.to_string(),
            group_column: group.to_string(),
            period_column: "year".to_string(),
            value_column: value.to_string(),
            aggregate_label: aggregate_label.to_string(),
            unit: unit.to_string(),
            delimiter: default_delimiter(),
            rename,
            projection: ProjectionSection::default(),
        }
    }
}
