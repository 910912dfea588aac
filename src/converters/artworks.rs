//! Artwork images.

use super::{Converter, Processed, display_name};
use crate::config::StudyConfig;
use crate::io::copy_with_sidecar;
use crate::lookup::LookupTables;
use crate::models::{Category, ParseMode, ResolvedIdentity, TaskKind};
use crate::parser::FilenameParser;
use crate::resolver::{MetadataResolver, SOLO_FIELDS, TOGETHER_FIELDS, require};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Sorts artwork scans into `together/` and `alone/` with canonical names.
///
/// Files matching neither artwork pattern are skipped, since the source
/// folder often holds unrelated images.
pub struct ArtworksConverter<'a> {
    source_dir: PathBuf,
    output_root: PathBuf,
    tables: &'a LookupTables,
}

impl<'a> ArtworksConverter<'a> {
    /// Creates the converter from the study configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `Art` has no source or destination.
    pub fn from_config(config: &StudyConfig, tables: &'a LookupTables) -> Result<Self> {
        let key = Category::Artwork.config_key();
        Ok(Self {
            source_dir: config.input_path(key)?,
            output_root: config.output_path(key)?,
            tables,
        })
    }
}

/// Destination folder and file name for an artwork.
///
/// `extension` includes the dot and is lowercased.
pub fn artwork_destination(
    identity: &ResolvedIdentity,
    extension: &str,
) -> Result<(&'static str, String)> {
    let ext = extension.to_lowercase();
    match identity.task_kind {
        TaskKind::Together => {
            require(identity, TOGETHER_FIELDS, "Together")?;
            let name = format!(
                "ses-{}_acq-dyad{}_task-codrawing{}_artwork{ext}",
                field(identity.session.as_deref()),
                field(identity.dyad.as_deref()),
                field(identity.task_num.as_deref()),
            );
            Ok(("together", name))
        },
        TaskKind::Solo => {
            require(identity, SOLO_FIELDS, "Solo")?;
            let name = format!(
                "sub-{}_ses-{}_acq-dyad{}_task-drawingalone_artwork{ext}",
                field(identity.subject.as_deref()),
                field(identity.session.as_deref()),
                field(identity.dyad.as_deref()),
            );
            Ok(("alone", name))
        },
        TaskKind::Unknown => Err(Error::InvalidInput("unknown artwork task type".to_string())),
    }
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

impl Converter for ArtworksConverter<'_> {
    fn category(&self) -> Category {
        Category::Artwork
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn process_one(&mut self, candidate: &Path) -> Result<Processed> {
        let name = display_name(candidate);
        let parser = FilenameParser::new(&self.tables.dyads);
        let Some(raw) = parser.parse(ParseMode::Artwork, &name) else {
            return Ok(Processed::Skipped("not an artwork name".to_string()));
        };

        let identity = MetadataResolver::new(self.tables).resolve(&raw);
        let extension = candidate
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let (folder, file_name) = artwork_destination(&identity, &extension)?;

        let written = copy_with_sidecar(candidate, &self.output_root.join(folder), &file_name, None)?;
        Ok(Processed::Written(written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{LoggingObserver, run_converter};
    use crate::lookup::DyadTable;
    use std::collections::BTreeMap;

    #[test]
    fn test_sorts_together_and_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StudyConfig::new(dir.path());
        config.sources = BTreeMap::from([("Art".to_string(), "scans".to_string())]);
        config.destinations = BTreeMap::from([("Art".to_string(), "art".to_string())]);
        let source = config.input_path("Art").unwrap();
        std::fs::create_dir_all(&source).unwrap();
        for name in [
            "dyad-1001-D2_session-3.TIF",
            "sub-102-solo_session-1.jpg",
            "sub-103-solo_session-1.jpg",
            "holiday.png",
        ] {
            std::fs::write(source.join(name), b"img").unwrap();
        }

        let tables = LookupTables {
            dyads: [("102", "2002")].into_iter().collect::<DyadTable>(),
            ..LookupTables::empty()
        };
        let mut converter = ArtworksConverter::from_config(&config, &tables).unwrap();
        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);

        let out = config.output_path("Art").unwrap();
        assert!(out.join("together").join("ses-03_acq-dyad1001_task-codrawing2_artwork.tif").exists());
        assert!(out.join("alone").join("sub-102_ses-01_acq-dyad2002_task-drawingalone_artwork.jpg").exists());
    }

    #[test]
    fn test_solo_without_dyad_names_missing_key() {
        let identity = ResolvedIdentity {
            subject: Some("103".to_string()),
            session: Some("01".to_string()),
            task_kind: TaskKind::Solo,
            ..Default::default()
        };
        let err = artwork_destination(&identity, ".jpg").unwrap_err();
        assert_eq!(err.to_string(), "missing [\"dyad\"] for Solo");
    }
}
