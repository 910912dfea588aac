//! Tab-separated tables with a header row.

use crate::{Error, Result};
use std::path::Path;

/// Value BIDS uses for empty cells.
pub const NA: &str = "n/a";

/// In-memory TSV table. Every row has as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TsvTable {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a table. Short rows are padded with `n/a`.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::operation("read_tsv", format!("{}: {e}", path.display())))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::operation("read_tsv_headers", e))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::operation("read_tsv", e))?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            row.resize(headers.len(), NA.to_string());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Writes the table, replacing empty cells with `n/a`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)
            .map_err(|e| Error::operation("write_tsv", format!("{}: {e}", path.display())))?;

        writer
            .write_record(&self.headers)
            .map_err(|e| Error::operation("write_tsv_headers", e))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|c| if c.is_empty() { NA } else { c.as_str() }))
                .map_err(|e| Error::operation("write_tsv", e))?;
        }
        writer.flush().map_err(|e| Error::operation("flush_tsv", e))
    }

    /// Column headers.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column, appending it filled with `default` when absent.
    pub fn ensure_column(&mut self, name: &str, default: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.to_string());
        }
        self.headers.len() - 1
    }

    /// Cell value.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Sets a cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: &str) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.to_string();
        }
    }

    /// Row whose `col` cell equals `key`.
    #[must_use]
    pub fn find_row(&self, col: usize, key: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.get(col).is_some_and(|c| c == key))
    }

    /// Appends a row of `n/a` with `key` in column `col`; returns its index.
    pub fn push_row(&mut self, col: usize, key: &str) -> usize {
        let mut row = vec![NA.to_string(); self.headers.len()];
        if let Some(cell) = row.get_mut(col) {
            *cell = key.to_string();
        }
        self.rows.push(row);
        self.rows.len() - 1
    }
}
