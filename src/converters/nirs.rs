//! fNIRS recordings to BIDS.

use super::{Converter, CategoryReport, Processed, display_name};
use crate::bids::{BidsPath, DatasetDescription, back_fill_participant_ages, patch_coordsystem_sidecars};
use crate::config::StudyConfig;
use crate::io::RecordingBackend;
use crate::lookup::LookupTables;
use crate::models::{Category, ParseMode, SexCode};
use crate::parser::{DEFAULT_RUN, FilenameParser};
use crate::resolver::{MetadataResolver, RECORDING_FIELDS, require};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Writes each `.snirf` recording into a BIDS tree.
///
/// After the loop the dataset description is written, coordinate-system
/// sidecars are completed and participant ages are filled in.
pub struct NirsConverter<'a> {
    source_dir: PathBuf,
    output_root: PathBuf,
    task_name: String,
    description: DatasetDescription,
    tables: &'a LookupTables,
    backend: &'a dyn RecordingBackend,
}

impl<'a> NirsConverter<'a> {
    /// Creates the converter from the study configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `NIRS` has no source or destination.
    pub fn from_config(
        config: &StudyConfig,
        tables: &'a LookupTables,
        backend: &'a dyn RecordingBackend,
    ) -> Result<Self> {
        let key = Category::Nirs.config_key();
        Ok(Self {
            source_dir: config.input_path(key)?,
            output_root: config.output_path(key)?,
            task_name: config.task_name.clone(),
            description: config.dataset_description(),
            tables,
            backend,
        })
    }

    /// Parses and resolves a candidate into its BIDS location and the sex
    /// to record, if the demographics table knows it.
    fn plan(&self, candidate: &Path) -> Result<(BidsPath, Option<SexCode>)> {
        let name = display_name(candidate);
        let parser = FilenameParser::new(&self.tables.dyads);
        let raw = parser
            .parse(ParseMode::Standard, &name)
            .ok_or_else(|| Error::UnrecognizedName {
                category: Category::Nirs.to_string(),
                name,
            })?;

        let identity = MetadataResolver::new(self.tables).resolve(&raw);
        require(&identity, RECORDING_FIELDS, "Recording")?;

        let (Some(subject), Some(session)) = (identity.subject, identity.session) else {
            return Err(Error::InvalidInput("recording identity incomplete".to_string()));
        };
        let target = BidsPath::new(&self.output_root)
            .with_subject(subject)
            .with_session(session)
            .with_task(&self.task_name)
            .with_acquisition(identity.acquisition_label.as_deref())
            .with_run(identity.run.unwrap_or_else(|| DEFAULT_RUN.to_string()))
            .with_datatype("nirs")
            .with_suffix("nirs")
            .with_extension(".snirf");
        Ok((target, identity.demographics.map(|d| d.sex)))
    }
}

impl Converter for NirsConverter<'_> {
    fn category(&self) -> Category {
        Category::Nirs
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn process_one(&mut self, candidate: &Path) -> Result<Processed> {
        let (target, sex) = self.plan(candidate)?;

        let mut recording = self.backend.read(candidate)?;
        recording.measurement_date = None;
        if sex.is_some() {
            recording.subject_sex = sex;
        }

        let written = self.backend.write(&recording, &target)?;
        Ok(Processed::Written(vec![written]))
    }

    /// Each step runs even if an earlier one failed; failures are logged.
    fn finalize(&mut self, _report: &CategoryReport) -> Result<()> {
        if let Err(e) = self.description.write(&self.output_root) {
            tracing::error!(error = %e, "Dataset description not written");
        }
        if let Err(e) = patch_coordsystem_sidecars(&self.output_root) {
            tracing::error!(error = %e, "Coordinate-system sidecars not patched");
        }
        if let Err(e) = back_fill_participant_ages(&self.output_root, &self.tables.demographics) {
            tracing::error!(error = %e, "Participant ages not filled in");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{HDF5_SIGNATURE, SnirfBackend};
    use crate::lookup::{DemographicsTable, DyadTable};
    use crate::models::Demographics;
    use crate::converters::{LoggingObserver, run_converter};
    use std::collections::BTreeMap;

    fn config(root: &Path) -> StudyConfig {
        let mut config = StudyConfig::new(root);
        config.sources = BTreeMap::from([("NIRS".to_string(), "nirs".to_string())]);
        config.destinations = BTreeMap::from([("NIRS".to_string(), "bids".to_string())]);
        config
    }

    fn tables() -> LookupTables {
        let mut demographics = DemographicsTable::default();
        demographics.insert(
            "7",
            "1",
            Demographics {
                age: Some("34".to_string()),
                sex: SexCode::Female,
            },
        );
        LookupTables {
            dyads: [("7", "1007")].into_iter().collect::<DyadTable>(),
            demographics,
        }
    }

    #[test]
    fn test_unconfigured_category_is_invalid() {
        let tables = LookupTables::empty();
        let backend = SnirfBackend::new();
        let result = NirsConverter::from_config(&StudyConfig::new("/study"), &tables, &backend);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_converts_and_finalizes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = config.input_path("NIRS").unwrap();
        std::fs::create_dir_all(&source).unwrap();

        let mut payload = HDF5_SIGNATURE.to_vec();
        payload.extend_from_slice(b"data");
        std::fs::write(source.join("sub-7_session-b_1.snirf"), &payload).unwrap();
        std::fs::write(source.join("recording_without_tags.snirf"), &payload).unwrap();

        let tables = tables();
        let backend = SnirfBackend::new();
        let mut converter = NirsConverter::from_config(&config, &tables, &backend).unwrap();
        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);

        let out = config.output_path("NIRS").unwrap();
        let nirs = out.join("sub-07").join("ses-01").join("nirs");
        assert!(nirs.join("sub-07_ses-01_task-drawing_acq-dyad1007_run-02_nirs.snirf").exists());

        let coords = crate::io::read_json(&nirs.join("sub-07_ses-01_acq-dyad1007_coordsystem.json")).unwrap();
        assert_eq!(coords["NIRSCoordinateProcessingDescription"], "n/a");
        assert!(out.join("dataset_description.json").exists());

        let participants = crate::bids::ParticipantsTable::open(&out.join("participants.tsv")).unwrap();
        assert_eq!(participants.age_of("sub-07"), Some("34"));
        assert_eq!(participants.sex_of("sub-07"), Some("F"));
    }

    #[test]
    fn test_finalize_continues_past_failed_description() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = config.input_path("NIRS").unwrap();
        std::fs::create_dir_all(&source).unwrap();
        let mut payload = HDF5_SIGNATURE.to_vec();
        payload.extend_from_slice(b"data");
        std::fs::write(source.join("sub-7_session-1.snirf"), &payload).unwrap();

        // A directory where the description file belongs makes that write fail.
        let out = config.output_path("NIRS").unwrap();
        std::fs::create_dir_all(out.join("dataset_description.json")).unwrap();

        let tables = tables();
        let backend = SnirfBackend::new();
        let mut converter = NirsConverter::from_config(&config, &tables, &backend).unwrap();
        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();
        assert_eq!(report.succeeded, 1);
        assert!(out.join("dataset_description.json").is_dir());

        let nirs = out.join("sub-07").join("ses-01").join("nirs");
        let coords = crate::io::read_json(&nirs.join("sub-07_ses-01_acq-dyad1007_coordsystem.json")).unwrap();
        assert_eq!(coords["NIRSCoordinateProcessingDescription"], "n/a");

        let participants = crate::bids::ParticipantsTable::open(&out.join("participants.tsv")).unwrap();
        assert_eq!(participants.age_of("sub-07"), Some("34"));
    }
}
