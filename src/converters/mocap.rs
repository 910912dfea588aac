//! Motion-capture tables.

use super::{Converter, Processed, display_name};
use crate::config::StudyConfig;
use crate::io::copy_with_sidecar;
use crate::lookup::LookupTables;
use crate::models::{Category, MocapTask, ParseMode};
use crate::parser::FilenameParser;
use crate::resolver::{MOCAP_FIELDS, MetadataResolver, require};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Copies motion-capture CSVs to
/// `acq-dyad<d>/ses-<s>/sub-dyad<d>_ses-<s>_acq-dyad<d>_task-<name>_mocap.csv`.
pub struct MocapConverter<'a> {
    source_dir: PathBuf,
    output_root: PathBuf,
    tables: &'a LookupTables,
}

impl<'a> MocapConverter<'a> {
    /// Creates the converter from the study configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `MoCap` has no source or destination.
    pub fn from_config(config: &StudyConfig, tables: &'a LookupTables) -> Result<Self> {
        let key = Category::MoCap.config_key();
        Ok(Self {
            source_dir: config.input_path(key)?,
            output_root: config.output_path(key)?,
            tables,
        })
    }
}

impl Converter for MocapConverter<'_> {
    fn category(&self) -> Category {
        Category::MoCap
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
        let raw = parser
            .parse(ParseMode::MoCap, &name)
            .ok_or_else(|| Error::UnrecognizedName {
                category: Category::MoCap.to_string(),
                name,
            })?;

        let identity = MetadataResolver::new(self.tables).resolve(&raw);
        require(&identity, MOCAP_FIELDS, "MoCap")?;
        let dyad = identity.dyad.unwrap_or_default();
        let session = identity.session.unwrap_or_default();
        let task_num = identity.task_num.unwrap_or_default();

        let task = MocapTask::from_number(&task_num).ok_or(Error::UnknownTask(task_num))?;

        let file_name = format!("sub-dyad{dyad}_ses-{session}_acq-dyad{dyad}_task-{task}_mocap.csv");
        let dest_dir = self
            .output_root
            .join(format!("acq-dyad{dyad}"))
            .join(format!("ses-{session}"));

        let written = copy_with_sidecar(candidate, &dest_dir, &file_name, None)?;
        Ok(Processed::Written(written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{LoggingObserver, run_converter};
    use std::collections::BTreeMap;

    #[test]
    fn test_unknown_task_fails_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StudyConfig::new(dir.path());
        config.sources = BTreeMap::from([("MoCap".to_string(), "mocap".to_string())]);
        config.destinations = BTreeMap::from([("MoCap".to_string(), "motion".to_string())]);
        let source = config.input_path("MoCap").unwrap();
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("dyad-1001_session-1_task-2.csv"), "t,x\n").unwrap();
        std::fs::write(source.join("dyad-1001_session-1_task-9.csv"), "t,x\n").unwrap();
        std::fs::write(source.join("calibration.csv"), "t,x\n").unwrap();

        let tables = LookupTables::empty();
        let mut converter = MocapConverter::from_config(&config, &tables).unwrap();
        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert!(report.outcomes.iter().any(|o| matches!(
            o,
            crate::models::ConversionOutcome::Failed { error: Error::UnknownTask(t), .. } if t == "9"
        )));

        let expected = config
            .output_path("MoCap")
            .unwrap()
            .join("acq-dyad1001")
            .join("ses-01")
            .join("sub-dyad1001_ses-01_acq-dyad1001_task-codrawing1_mocap.csv");
        assert!(expected.exists());
    }
}
