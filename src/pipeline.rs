//! Whole-study jobs.
//!
//! [`inventory`] reports what the configured source folders hold;
//! [`run`] loads the lookup tables once and drives the requested
//! categories in the fixed order NIRS, Art, Coord, MoCap.

use crate::config::StudyConfig;
use crate::converters::{
    ArtworksConverter, CategoryReport, Converter, CoordinatesConverter, MocapConverter,
    NirsConverter, ProgressObserver, run_converter,
};
use crate::io::RecordingBackend;
use crate::lookup::LookupTables;
use crate::models::Category;
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Which categories a run converts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every configured category. Missing source folders are skipped.
    #[default]
    All,
    /// Only these. A missing source folder aborts the run.
    Only(Vec<Category>),
}

impl Selection {
    /// Returns whether `category` is selected.
    #[must_use]
    pub fn includes(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(categories) => categories.contains(&category),
        }
    }

    /// Returns whether categories were named explicitly.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

/// One configured source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    /// Key under `Sources`.
    pub key: String,
    /// Configured folder name.
    pub folder: String,
    /// Resolved path.
    pub path: PathBuf,
    /// Whether the folder exists.
    pub exists: bool,
    /// Number of entries directly inside it.
    pub items: usize,
}

/// Checks every configured source folder.
#[must_use]
pub fn inventory(config: &StudyConfig) -> Vec<InventoryEntry> {
    config
        .sources
        .iter()
        .filter_map(|(key, folder)| {
            let path = match config.input_path(key) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(key, error = %e, "Config error in source");
                    return None;
                },
            };
            let items = std::fs::read_dir(&path).map_or(0, Iterator::count);
            let entry = InventoryEntry {
                key: key.clone(),
                folder: folder.clone(),
                exists: path.is_dir(),
                path,
                items,
            };
            tracing::info!(
                key = %entry.key,
                folder = %entry.folder,
                exists = entry.exists,
                items = entry.items,
                "Source inventory"
            );
            Some(entry)
        })
        .collect()
}

/// Builds the driver for a category.
///
/// # Errors
///
/// Returns an error if the category's source or destination is not configured.
pub fn converter_for<'a>(
    category: Category,
    config: &StudyConfig,
    tables: &'a LookupTables,
    backend: &'a dyn RecordingBackend,
) -> Result<Box<dyn Converter + 'a>> {
    Ok(match category {
        Category::Nirs => Box::new(NirsConverter::from_config(config, tables, backend)?),
        Category::Artwork => Box::new(ArtworksConverter::from_config(config, tables)?),
        Category::Coordinates => Box::new(CoordinatesConverter::from_config(config, tables)?),
        Category::MoCap => Box::new(MocapConverter::from_config(config, tables)?),
    })
}

/// Converts the selected categories.
///
/// # Errors
///
/// Returns [`crate::Error::SourceNotFound`] when an explicitly selected
/// category's source folder is missing. The check runs before any category
/// is converted. Nothing else aborts the run.
pub fn run(
    config: &StudyConfig,
    selection: &Selection,
    backend: &dyn RecordingBackend,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<CategoryReport>> {
    if selection.is_explicit() {
        check_sources(config, selection)?;
    }

    let tables = LookupTables::load(&config.dyad_list_path(), &config.demographics_path());
    let mut reports = Vec::new();

    for &category in Category::all() {
        if !selection.includes(category) {
            continue;
        }
        if !config.has_source(category.config_key()) {
            tracing::info!(%category, "Skipping, not configured");
            continue;
        }

        let mut converter = match converter_for(category, config, &tables, backend) {
            Ok(converter) => converter,
            Err(e) => {
                tracing::error!(%category, error = %e, "Config error, skipping category");
                continue;
            },
        };

        match run_converter(converter.as_mut(), &mut *observer) {
            Ok(report) => reports.push(report),
            Err(e) if e.is_fatal() && selection.is_explicit() => return Err(e),
            Err(e) => {
                tracing::warn!(%category, error = %e, "Skipping category");
            },
        }
    }

    Ok(reports)
}

/// Fails on the first selected, configured category whose source folder is missing.
fn check_sources(config: &StudyConfig, selection: &Selection) -> Result<()> {
    for &category in Category::all() {
        let key = category.config_key();
        if !selection.includes(category) || !config.has_source(key) {
            continue;
        }
        let path = config.input_path(key)?;
        if !path.is_dir() {
            return Err(Error::SourceNotFound {
                category: key.to_string(),
                path,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::LoggingObserver;
    use crate::io::SnirfBackend;
    use std::collections::BTreeMap;

    fn config(root: &std::path::Path) -> StudyConfig {
        let mut config = StudyConfig::new(root);
        config.sources = BTreeMap::from([
            ("Art".to_string(), "scans".to_string()),
            ("MoCap".to_string(), "mocap".to_string()),
        ]);
        config.destinations = BTreeMap::from([
            ("Art".to_string(), "art".to_string()),
            ("MoCap".to_string(), "motion".to_string()),
        ]);
        config
    }

    #[test]
    fn test_inventory_reports_missing_folders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let scans = config.input_path("Art").unwrap();
        std::fs::create_dir_all(&scans).unwrap();
        std::fs::write(scans.join("a.tif"), "").unwrap();

        let entries = inventory(&config);
        assert_eq!(entries.len(), 2);
        let art = entries.iter().find(|e| e.key == "Art").unwrap();
        assert!(art.exists);
        assert_eq!(art.items, 1);
        let mocap = entries.iter().find(|e| e.key == "MoCap").unwrap();
        assert!(!mocap.exists);
    }

    #[test]
    fn test_explicit_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let err = run(
            &config,
            &Selection::Only(vec![Category::MoCap]),
            &SnirfBackend::new(),
            &mut LoggingObserver,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { ref category, .. } if category == "MoCap"));
    }

    #[test]
    fn test_explicit_missing_source_stops_before_converting() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let scans = config.input_path("Art").unwrap();
        std::fs::create_dir_all(&scans).unwrap();
        std::fs::write(scans.join("dyad-1001-D1_session-1.png"), "").unwrap();

        let err = run(
            &config,
            &Selection::Only(vec![Category::Artwork, Category::MoCap]),
            &SnirfBackend::new(),
            &mut LoggingObserver,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { ref category, .. } if category == "MoCap"));
        assert!(!config.output_path("Art").unwrap().exists());
    }

    #[test]
    fn test_run_all_skips_missing_and_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let scans = config.input_path("Art").unwrap();
        std::fs::create_dir_all(&scans).unwrap();
        std::fs::write(scans.join("dyad-1001-D1_session-1.png"), "").unwrap();

        let reports = run(&config, &Selection::All, &SnirfBackend::new(), &mut LoggingObserver).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].category, Category::Artwork);
        assert_eq!(reports[0].succeeded, 1);
    }
}
