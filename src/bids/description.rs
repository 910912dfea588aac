//! Top-level `dataset_description.json`.

use crate::Result;
use crate::io::write_json;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the dataset description at the dataset root.
pub const DESCRIPTION_FILE: &str = "dataset_description.json";

/// BIDS version the generated datasets declare.
pub const BIDS_VERSION: &str = "1.9.0";

/// Mandatory dataset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetDescription {
    /// Dataset name.
    pub name: String,
    /// BIDS version the dataset conforms to.
    #[serde(rename = "BIDSVersion")]
    pub bids_version: String,
    /// Always `"raw"` for converted recordings.
    pub dataset_type: String,
    /// Dataset authors.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Data license.
    pub license: String,
    /// Datasets this one was derived from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_datasets: Vec<String>,
}

impl DatasetDescription {
    /// Creates a raw-dataset description.
    #[must_use]
    pub fn new(name: impl Into<String>, license: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bids_version: BIDS_VERSION.to_string(),
            dataset_type: "raw".to_string(),
            authors: Vec::new(),
            license: license.into(),
            source_datasets: Vec::new(),
        }
    }

    /// Sets the authors.
    #[must_use]
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Sets the source datasets.
    #[must_use]
    pub fn with_source_datasets(mut self, sources: Vec<String>) -> Self {
        self.source_datasets = sources;
        self
    }

    /// Writes the description into `root`, replacing any previous one.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(DESCRIPTION_FILE);
        write_json(&path, self)?;
        tracing::debug!(path = %path.display(), "Wrote dataset description");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_keys() {
        let dir = tempfile::tempdir().unwrap();
        let description = DatasetDescription::new("Drawing study", "CC0")
            .with_authors(vec!["A. Author".to_string()]);
        let path = description.write(dir.path()).unwrap();

        let value = crate::io::read_json(&path).unwrap();
        assert_eq!(value["Name"], "Drawing study");
        assert_eq!(value["BIDSVersion"], BIDS_VERSION);
        assert_eq!(value["DatasetType"], "raw");
        assert_eq!(value["Authors"][0], "A. Author");
        assert_eq!(value["License"], "CC0");
        assert!(value.get("SourceDatasets").is_none());
    }

    #[test]
    fn test_rewrite_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        DatasetDescription::new("first", "CC0").write(dir.path()).unwrap();
        DatasetDescription::new("second", "CC-BY-4.0")
            .write(dir.path())
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join(DESCRIPTION_FILE)).unwrap();
        let parsed: DatasetDescription = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.name, "second");
        assert_eq!(parsed.license, "CC-BY-4.0");
    }
}
