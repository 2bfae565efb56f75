//! CSV ingestion for regional statistics tables.
//!
//! Source tables are `;`-separated exports with inconsistent whitespace in
//! headers and cells. Loading:
//! - trims every header and cell
//! - maps source headers onto canonical names via the config's rename map
//! - parses the period column as a year (`2020` or `2020.0`)
//! - parses the value column as a number, accepting a decimal comma
//!
//! Every column is kept as a label; columns that also parse as numbers are
//! kept as values too. Empty cells are left out of the row.

use std::io::Read;
use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use trendcast_core::domain::{Dataset, Row};

use crate::config::{ConfigError, DashboardConfig};

/// Errors from reading a source table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: column '{column}' has invalid number '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A parsed table plus its provenance hash.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    /// BLAKE3 hex digest over the normalized rows.
    pub fingerprint: String,
}

/// Load a table from disk.
pub fn load_csv(path: &Path, config: &DashboardConfig) -> Result<LoadedDataset, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = read_csv(file, config)?;
    info!(
        "loaded {} rows from {} (fingerprint {})",
        loaded.dataset.len(),
        path.display(),
        &loaded.fingerprint[..12]
    );
    Ok(loaded)
}

/// Read a table from any byte source.
pub fn read_csv<R: Read>(reader: R, config: &DashboardConfig) -> Result<LoadedDataset, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| config.canonical_column(h.trim()).to_string())
        .collect();

    let index_of = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IngestError::MissingColumn(column.to_string()))
    };
    let period_idx = index_of(&config.period_column)?;
    let value_idx = index_of(&config.value_column)?;
    index_of(&config.group_column)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let raw_period = record.get(period_idx).unwrap_or("");
        let period = parse_period(raw_period).ok_or_else(|| IngestError::InvalidNumber {
            line,
            column: config.period_column.clone(),
            value: raw_period.to_string(),
        })?;

        let mut row = Row::new(period);
        for (idx, cell) in record.iter().enumerate() {
            let Some(column) = headers.get(idx) else {
                continue;
            };
            if idx == period_idx {
                continue;
            }
            if idx == value_idx {
                if cell.is_empty() {
                    continue;
                }
                let value = parse_number(cell).ok_or_else(|| IngestError::InvalidNumber {
                    line,
                    column: column.clone(),
                    value: cell.to_string(),
                })?;
                row.values.insert(column.clone(), value);
                continue;
            }
            if cell.is_empty() {
                continue;
            }
            row.labels.insert(column.clone(), cell.to_string());
            if let Some(value) = parse_number(cell) {
                row.values.insert(column.clone(), value);
            }
        }
        rows.push(row);
    }

    let dataset = Dataset::new(rows);
    for (group, period) in dataset.duplicate_keys(&config.group_column) {
        warn!("duplicate rows for '{group}' in {period}; all are kept");
    }
    let fingerprint = fingerprint(&dataset);
    Ok(LoadedDataset {
        dataset,
        fingerprint,
    })
}

/// Parse a year written as an integer or an integral float.
fn parse_period(raw: &str) -> Option<i32> {
    if let Ok(p) = raw.parse::<i32>() {
        return Some(p);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}

/// Parse a finite number, accepting `4,5` for `4.5`.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    let parsed = match raw.parse::<f64>() {
        Ok(v) => v,
        Err(_) if raw.matches(',').count() == 1 && !raw.contains('.') => {
            raw.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// BLAKE3 digest over periods, labels and values in row order.
///
/// Labels and values are stored in sorted maps, so the digest does not
/// depend on source column order.
fn fingerprint(dataset: &Dataset) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in dataset.rows() {
        hasher.update(&row.period.to_le_bytes());
        for (column, label) in &row.labels {
            hasher.update(column.as_bytes());
            hasher.update(b"=");
            hasher.update(label.as_bytes());
            hasher.update(b"\x1f");
        }
        for (column, value) in &row.values {
            hasher.update(column.as_bytes());
            hasher.update(&value.to_le_bytes());
        }
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
