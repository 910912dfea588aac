//! Optode coordinate folders.

use super::{Converter, Processed, display_name, gather_folders};
use crate::config::StudyConfig;
use crate::io::copy_with_sidecar;
use crate::lookup::LookupTables;
use crate::models::{Category, ParseMode};
use crate::parser::FilenameParser;
use crate::resolver::{COORDINATES_FIELDS, MetadataResolver, require};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Files looked for in a `sub-<n>_session-<n>` folder, as
/// (suffix after the folder name, target suffix).
pub const COORDINATE_FILES: [(&str, &str); 3] = [
    (".csv", "optodeCoordinates.csv"),
    ("_distances.csv", "channelLengths.csv"),
    ("_optode_dist.csv", "distancesToRoi.csv"),
];

/// Copies per-session coordinate bundles into `sub-<s>/ses-<s>/`.
///
/// A folder succeeds when at least one of its files was copied.
pub struct CoordinatesConverter<'a> {
    source_dir: PathBuf,
    output_root: PathBuf,
    tables: &'a LookupTables,
}

impl<'a> CoordinatesConverter<'a> {
    /// Creates the converter from the study configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `Coord` has no source or destination.
    pub fn from_config(config: &StudyConfig, tables: &'a LookupTables) -> Result<Self> {
        let key = Category::Coordinates.config_key();
        Ok(Self {
            source_dir: config.input_path(key)?,
            output_root: config.output_path(key)?,
            tables,
        })
    }
}

impl Converter for CoordinatesConverter<'_> {
    fn category(&self) -> Category {
        Category::Coordinates
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn gather_candidates(&self) -> Result<Vec<PathBuf>> {
        gather_folders(&self.source_dir, "sub-")
    }

    fn process_one(&mut self, folder: &Path) -> Result<Processed> {
        let folder_name = display_name(folder);
        let parser = FilenameParser::new(&self.tables.dyads);
        let raw = parser
            .parse(ParseMode::Coordinates, &folder_name)
            .ok_or_else(|| Error::UnrecognizedName {
                category: Category::Coordinates.to_string(),
                name: folder_name.clone(),
            })?;

        let identity = MetadataResolver::new(self.tables).resolve(&raw);
        require(&identity, COORDINATES_FIELDS, "Coordinates")?;
        let subject = identity.subject.unwrap_or_default();
        let session = identity.session.unwrap_or_default();
        let dyad = identity.dyad.unwrap_or_default();

        let prefix = format!("sub-{subject}_ses-{session}_acq-dyad{dyad}_");
        let dest_dir = self
            .output_root
            .join(format!("sub-{subject}"))
            .join(format!("ses-{session}"));

        let mut written = Vec::new();
        for (source_suffix, target_suffix) in COORDINATE_FILES {
            let source = folder.join(format!("{folder_name}{source_suffix}"));
            if !source.is_file() {
                continue;
            }
            let target = format!("{prefix}{target_suffix}");
            match copy_with_sidecar(&source, &dest_dir, &target, None) {
                Ok(paths) => written.extend(paths),
                Err(e) => {
                    tracing::error!(source = %source.display(), error = %e, "Failed to copy coordinate file");
                },
            }
        }

        if written.is_empty() {
            return Err(Error::NoMatchingFiles(folder_name));
        }
        Ok(Processed::Written(written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{LoggingObserver, run_converter};
    use crate::lookup::DyadTable;
    use std::collections::BTreeMap;

    fn setup(dir: &Path) -> StudyConfig {
        let mut config = StudyConfig::new(dir);
        config.sources = BTreeMap::from([("Coord".to_string(), "coords".to_string())]);
        config.destinations = BTreeMap::from([("Coord".to_string(), "coordinates".to_string())]);
        config
    }

    #[test]
    fn test_partial_folder_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let folder = config.input_path("Coord").unwrap().join("sub-101_session-1");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("sub-101_session-1.csv"), "x,y,z\n").unwrap();

        let empty = config.input_path("Coord").unwrap().join("sub-102_session-1");
        std::fs::create_dir_all(&empty).unwrap();

        let tables = LookupTables {
            dyads: [("101", "1001"), ("102", "1001")]
                .into_iter()
                .collect::<DyadTable>(),
            ..LookupTables::empty()
        };
        let mut converter = CoordinatesConverter::from_config(&config, &tables).unwrap();
        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        let expected = config
            .output_path("Coord")
            .unwrap()
            .join("sub-101")
            .join("ses-01")
            .join("sub-101_ses-01_acq-dyad1001_optodeCoordinates.csv");
        assert!(matches!(
            &report.outcomes[0],
            crate::models::ConversionOutcome::Success { destinations, .. } if destinations == &vec![expected.clone()]
        ));
        assert!(expected.is_file());
        assert!(matches!(
            &report.outcomes[1],
            crate::models::ConversionOutcome::Failed { error: Error::NoMatchingFiles(_), .. }
        ));
    }

    #[test]
    fn test_folder_without_dyad_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let folder = config.input_path("Coord").unwrap().join("sub-101_session-1");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("sub-101_session-1_distances.csv"), "").unwrap();

        let tables = LookupTables::empty();
        let mut converter = CoordinatesConverter::from_config(&config, &tables).unwrap();
        let err = converter.process_one(&folder).unwrap_err();
        assert!(matches!(err, Error::MissingFields { ref missing, .. } if missing == &["dyad"]));
    }
}
