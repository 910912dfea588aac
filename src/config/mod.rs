//! Study configuration.
//!
//! A study is described by one file at the project root, `study_config.json`
//! (or a `.toml` equivalent). Keys are PascalCase:
//!
//! ```json
//! {
//!     "Directories": {"InputRoot": "inputs", "OutputRoot": "outputs"},
//!     "Sources": {"NIRS": "raw_nirs", "Art": "scans"},
//!     "Destination": {"NIRS": "bids", "Art": "artworks"},
//!     "TaskName": "drawing",
//!     "StudyName": "Drawing study",
//!     "Authors": ["A. Author"],
//!     "DataLicense": "CC0"
//! }
//! ```
//!
//! The directory holding the file is the project root. Relative paths, and
//! the two lookup tables, are resolved against it.

use crate::bids::DatasetDescription;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "study_config.json";
/// Dyad list, relative to the project root.
pub const DYAD_FILE: &str = "dyadlist.csv";
/// Demographics table, relative to the project root.
pub const DEMOGRAPHICS_FILE: &str = "questionnaireData.csv";

/// Loaded study configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyConfig {
    /// Project root.
    pub root: PathBuf,
    /// Input folder under the root.
    pub input_root: String,
    /// Output folder under the root.
    pub output_root: String,
    /// Source folder per category key.
    pub sources: BTreeMap<String, String>,
    /// Destination folder per category key.
    pub destinations: BTreeMap<String, String>,
    /// BIDS task label for recordings.
    pub task_name: String,
    /// Dataset name.
    pub study_name: String,
    /// Dataset authors.
    pub authors: Vec<String>,
    /// Data license.
    pub license: String,
    /// Datasets this one derives from.
    pub source_datasets: Vec<String>,
}

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigFile {
    /// Input and output roots.
    pub directories: Option<ConfigFileDirectories>,
    /// Source folders.
    pub sources: Option<BTreeMap<String, String>>,
    /// Destination folders.
    pub destination: Option<BTreeMap<String, String>>,
    /// Task label.
    pub task_name: Option<String>,
    /// Study name.
    pub study_name: Option<String>,
    /// Authors.
    pub authors: Option<Vec<String>>,
    /// License.
    pub data_license: Option<String>,
    /// Source datasets.
    pub source_datasets: Option<Vec<String>>,
}

/// Directories section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigFileDirectories {
    /// Input root.
    pub input_root: Option<String>,
    /// Output root.
    pub output_root: Option<String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            input_root: "inputs".to_string(),
            output_root: "outputs".to_string(),
            sources: BTreeMap::new(),
            destinations: BTreeMap::new(),
            task_name: "drawing".to_string(),
            study_name: "Untitled".to_string(),
            authors: Vec::new(),
            license: "CC0".to_string(),
            source_datasets: Vec::new(),
        }
    }
}

impl StudyConfig {
    /// Creates a configuration with default values rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Loads the configuration file.
    ///
    /// Files ending in `.toml` are read as TOML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist, or
    /// [`Error::OperationFailed`] if it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", format!("{}: {e}", path.display())))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let file: ConfigFile = if is_toml {
            toml::from_str(&contents).map_err(|e| Error::operation("parse_config_file", e))?
        } else {
            serde_json::from_str(&contents).map_err(|e| Error::operation("parse_config_file", e))?
        };

        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let config = Self::from_config_file(root, file);
        tracing::debug!(
            path = %path.display(),
            sources = config.sources.len(),
            destinations = config.destinations.len(),
            "Loaded study config"
        );
        Ok(config)
    }

    /// Converts a `ConfigFile` to `StudyConfig`.
    fn from_config_file(root: PathBuf, file: ConfigFile) -> Self {
        let mut config = Self::new(root);

        if let Some(dirs) = file.directories {
            if let Some(input_root) = dirs.input_root {
                config.input_root = input_root;
            }
            if let Some(output_root) = dirs.output_root {
                config.output_root = output_root;
            }
        }
        if let Some(sources) = file.sources {
            config.sources = sources;
        }
        if let Some(destinations) = file.destination {
            config.destinations = destinations;
        }
        if let Some(task_name) = file.task_name {
            config.task_name = task_name;
        }
        if let Some(study_name) = file.study_name {
            config.study_name = study_name;
        }
        if let Some(authors) = file.authors {
            config.authors = authors;
        }
        if let Some(license) = file.data_license {
            config.license = license;
        }
        if let Some(sources) = file.source_datasets {
            config.source_datasets = sources;
        }

        config
    }

    /// Returns whether a source folder is configured for `key`.
    #[must_use]
    pub fn has_source(&self, key: &str) -> bool {
        self.sources.get(key).is_some_and(|s| !s.is_empty())
    }

    /// `<root>/<InputRoot>/<Sources[key]>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `key` is not a configured source.
    pub fn input_path(&self, key: &str) -> Result<PathBuf> {
        let folder = lookup(&self.sources, key, "Sources")?;
        Ok(self.root.join(&self.input_root).join(folder))
    }

    /// `<root>/<OutputRoot>/<Destination[key]>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `key` is not a configured destination.
    pub fn output_path(&self, key: &str) -> Result<PathBuf> {
        let folder = lookup(&self.destinations, key, "Destination")?;
        Ok(self.root.join(&self.output_root).join(folder))
    }

    /// Keeps absolute paths; anchors relative ones at the project root.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path of the dyad list.
    #[must_use]
    pub fn dyad_list_path(&self) -> PathBuf {
        self.root.join(DYAD_FILE)
    }

    /// Path of the demographics table.
    #[must_use]
    pub fn demographics_path(&self) -> PathBuf {
        self.root.join(DEMOGRAPHICS_FILE)
    }

    /// Dataset description built from the study fields.
    #[must_use]
    pub fn dataset_description(&self) -> DatasetDescription {
        DatasetDescription::new(&self.study_name, &self.license)
            .with_authors(self.authors.clone())
            .with_source_datasets(self.source_datasets.clone())
    }
}

fn lookup<'m>(map: &'m BTreeMap<String, String>, key: &str, section: &str) -> Result<&'m str> {
    map.get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("key '{key}' not found in config '{section}'")))
}
