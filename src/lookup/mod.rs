//! Auxiliary lookup tables.
//!
//! Two small CSV tables enrich every conversion:
//!
//! | Table | Columns | Key |
//! |-------|---------|-----|
//! | Dyad list | `dyadID, pID1, pID2` | normalised subject id |
//! | Demographics | `p_id, visit, gender, age` | `"{subject}_{visit:02}"` |
//!
//! Loaders return [`LoadError`] so tests can see what went wrong, but the
//! composition layer ([`LookupTables::load`]) always degrades a failed table
//! to an empty one with a warning. Conversions still run, just without dyad
//! labels or demographics.

mod demographics;
mod dyads;

pub use demographics::DemographicsTable;
pub use dyads::{DyadGrouping, DyadTable};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

/// Failure while loading a lookup table.
#[derive(Debug, ThisError)]
pub enum LoadError {
    /// The table file does not exist.
    #[error("table not found at {}", .0.display())]
    Missing(PathBuf),

    /// The file could not be opened.
    #[error("failed to open table: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV structure is broken.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// An expected column is absent.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// A row holds a value that cannot be normalised.
    #[error("malformed row {row}: {cause}")]
    MalformedRow {
        /// 1-based data row number.
        row: usize,
        /// What was wrong with it.
        cause: String,
    },
}

/// Lookup tables held read-only for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    /// Subject to dyad mapping.
    pub dyads: DyadTable,
    /// Subject visit to demographics mapping.
    pub demographics: DemographicsTable,
}

impl LookupTables {
    /// Creates empty tables.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads both tables, each degrading independently to empty.
    #[must_use]
    pub fn load(dyad_path: &Path, demographics_path: &Path) -> Self {
        let dyads = degrade(DyadTable::load(dyad_path), "dyad list", dyad_path);
        let demographics = degrade(
            DemographicsTable::load(demographics_path),
            "demographics",
            demographics_path,
        );

        tracing::info!(
            dyad_subjects = dyads.len(),
            demographic_visits = demographics.len(),
            "Loaded lookup tables"
        );

        Self {
            dyads,
            demographics,
        }
    }
}

/// Loads the dyad list as dyad to members, degrading to empty.
#[must_use]
pub fn load_dyad_grouping(path: &Path) -> DyadGrouping {
    degrade(DyadGrouping::load(path), "dyad grouping", path)
}

/// Turns a table load failure into an empty table plus a log line.
pub(crate) fn degrade<T: Default>(
    result: Result<T, LoadError>,
    table: &str,
    path: &Path,
) -> T {
    match result {
        Ok(table) => table,
        Err(LoadError::Missing(_)) => {
            tracing::warn!(table, path = %path.display(), "Lookup table not found, continuing without it");
            T::default()
        },
        Err(e) => {
            tracing::error!(table, path = %path.display(), error = %e, "Failed to read lookup table, continuing without it");
            T::default()
        },
    }
}

/// Opens a CSV table with every field read as text.
fn open_table(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(csv_reader(file))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Finds a column by exact header name.
fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Returns a trimmed, non-empty field.
fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> Option<&'r str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}
