//! Conversion drivers.
//!
//! Each source category implements [`Converter`]; [`run_converter`] is the
//! one loop they all share:
//!
//! ```text
//! check source ─► create output root ─► gather ─► for each: process_one ─► outcome
//!                                                                        │
//!                                             finalize ◄── report ◄──────┘
//! ```
//!
//! A failure on one candidate is recorded and the loop moves on. Only a
//! missing source directory stops a category, and it does so before the
//! first candidate.

mod artworks;
mod coordinates;
mod mocap;
mod nirs;

pub use artworks::{ArtworksConverter, artwork_destination};
pub use coordinates::{COORDINATE_FILES, CoordinatesConverter};
pub use mocap::MocapConverter;
pub use nirs::NirsConverter;

use crate::models::{Category, ConversionOutcome};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// What processing one candidate produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// Files written, in order.
    Written(Vec<PathBuf>),
    /// The candidate does not belong to this category.
    Skipped(String),
}

/// A per-category conversion driver.
pub trait Converter {
    /// The category this driver converts.
    fn category(&self) -> Category;

    /// Directory candidates are gathered from.
    fn source_dir(&self) -> &Path;

    /// Directory outputs are written under.
    fn output_root(&self) -> &Path;

    /// Lists the candidates, sorted and deduplicated.
    ///
    /// Defaults to the files of [`Converter::source_dir`] whose extension is
    /// one of the category's, compared case-insensitively.
    fn gather_candidates(&self) -> Result<Vec<PathBuf>> {
        gather_files(self.source_dir(), self.category().extensions())
    }

    /// Converts one candidate.
    fn process_one(&mut self, candidate: &Path) -> Result<Processed>;

    /// Runs once after the loop, when there was at least one candidate.
    fn finalize(&mut self, _report: &CategoryReport) -> Result<()> {
        Ok(())
    }
}

/// Receives every outcome as it happens.
pub trait ProgressObserver {
    /// Called once per candidate, in processing order.
    fn on_file_processed(&mut self, category: Category, outcome: &ConversionOutcome);
}

/// Observer that logs each outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_file_processed(&mut self, category: Category, outcome: &ConversionOutcome) {
        let source = display_name(outcome.source());
        match outcome {
            ConversionOutcome::Success { destinations, .. } => {
                let destination = destinations
                    .first()
                    .map(|d| display_name(d))
                    .unwrap_or_default();
                tracing::info!(%category, %source, %destination, written = destinations.len(), "Converted");
            },
            ConversionOutcome::Skipped { reason, .. } => {
                tracing::debug!(%category, %source, %reason, "Skipped");
            },
            ConversionOutcome::Failed { error, .. } => {
                tracing::error!(%category, %source, error = %error, "Conversion failed");
            },
        }
    }
}

/// Aggregate result of one category run.
#[derive(Debug)]
pub struct CategoryReport {
    /// The category.
    pub category: Category,
    /// Candidates converted.
    pub succeeded: usize,
    /// Candidates that failed.
    pub failed: usize,
    /// Candidates skipped as unrelated.
    pub skipped: usize,
    /// Every outcome, in processing order.
    pub outcomes: Vec<ConversionOutcome>,
}

impl CategoryReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
        }
    }

    /// Counts and stores an outcome.
    pub fn record(&mut self, outcome: ConversionOutcome) {
        match &outcome {
            ConversionOutcome::Success { .. } => self.succeeded += 1,
            ConversionOutcome::Skipped { .. } => self.skipped += 1,
            ConversionOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Number of candidates seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Drives one converter over its candidates.
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] when the source directory is missing,
/// or an error when the output root cannot be created or candidates cannot
/// be listed. Per-candidate failures are recorded in the report instead.
pub fn run_converter<C, O>(converter: &mut C, observer: &mut O) -> Result<CategoryReport>
where
    C: Converter + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let category = converter.category();
    let source_dir = converter.source_dir().to_path_buf();
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound {
            category: category.config_key().to_string(),
            path: source_dir,
        });
    }

    let output_root = converter.output_root();
    std::fs::create_dir_all(output_root).map_err(|e| {
        Error::operation("create_output_root", format!("{}: {e}", output_root.display()))
    })?;

    let candidates = converter.gather_candidates()?;
    let mut report = CategoryReport::new(category);
    if candidates.is_empty() {
        tracing::info!(%category, source = %source_dir.display(), "No files found");
        return Ok(report);
    }

    tracing::info!(%category, candidates = candidates.len(), source = %source_dir.display(), "Starting conversion");

    for candidate in candidates {
        let outcome = match converter.process_one(&candidate) {
            Ok(Processed::Written(destinations)) => ConversionOutcome::Success {
                source: candidate,
                destinations,
            },
            Ok(Processed::Skipped(reason)) => ConversionOutcome::Skipped {
                source: candidate,
                reason,
            },
            Err(error) => ConversionOutcome::Failed {
                source: candidate,
                error,
            },
        };
        observer.on_file_processed(category, &outcome);
        report.record(outcome);
    }

    if let Err(e) = converter.finalize(&report) {
        tracing::error!(%category, error = %e, "Finalization failed");
    }

    tracing::info!(
        %category,
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        "Conversion complete"
    );
    Ok(report)
}

/// Files directly in `dir` with one of `extensions`, case-insensitively.
pub fn gather_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let found: BTreeSet<PathBuf> = list_dir(dir)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        })
        .collect();
    Ok(found.into_iter().collect())
}

/// Folders directly in `dir` whose names start with `prefix`, case-insensitively.
pub fn gather_folders(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let found: BTreeSet<PathBuf> = list_dir(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.get(..prefix.len()))
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .collect();
    Ok(found.into_iter().collect())
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::operation("list_candidates", format!("{}: {e}", dir.display())))?;
    Ok(entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
}

/// File name of a candidate, or the whole path when it has none.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Converter that copies nothing and fails on names containing "bad".
    struct Probe {
        source: PathBuf,
        output: PathBuf,
        finalized: Option<usize>,
    }

    impl Converter for Probe {
        fn category(&self) -> Category {
            Category::MoCap
        }

        fn source_dir(&self) -> &Path {
            &self.source
        }

        fn output_root(&self) -> &Path {
            &self.output
        }

        fn process_one(&mut self, candidate: &Path) -> Result<Processed> {
            let name = display_name(candidate);
            if name.contains("bad") {
                return Err(Error::UnrecognizedName {
                    category: "MoCap".to_string(),
                    name,
                });
            }
            if name.contains("other") {
                return Ok(Processed::Skipped("unrelated".to_string()));
            }
            Ok(Processed::Written(vec![self.output.join(name)]))
        }

        fn finalize(&mut self, report: &CategoryReport) -> Result<()> {
            self.finalized = Some(report.total());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<bool>);

    impl ProgressObserver for Recorder {
        fn on_file_processed(&mut self, _category: Category, outcome: &ConversionOutcome) {
            self.0.push(outcome.is_success());
        }
    }

    fn probe(dir: &Path) -> Probe {
        Probe {
            source: dir.join("in"),
            output: dir.join("out"),
            finalized: None,
        }
    }

    #[test]
    fn test_failures_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut converter = probe(dir.path());
        std::fs::create_dir_all(&converter.source).unwrap();
        for name in ["a.csv", "bad.CSV", "c.csv", "other.csv", "notes.txt"] {
            std::fs::write(converter.source.join(name), "").unwrap();
        }

        let mut recorder = Recorder::default();
        let report = run_converter(&mut converter, &mut recorder).unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(recorder.0.len(), 4);
        assert_eq!(converter.finalized, Some(4));
        assert!(converter.output.is_dir());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut converter = probe(dir.path());

        let err = run_converter(&mut converter, &mut LoggingObserver).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
        assert!(!converter.output.exists());
    }

    #[test]
    fn test_empty_source_skips_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let mut converter = probe(dir.path());
        std::fs::create_dir_all(&converter.source).unwrap();

        let report = run_converter(&mut converter, &mut LoggingObserver).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(converter.finalized, None);
    }

    #[test]
    fn test_gather_folders_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub-101_session-1")).unwrap();
        std::fs::create_dir(dir.path().join("SUB-102_session-1")).unwrap();
        std::fs::create_dir(dir.path().join("misc")).unwrap();
        std::fs::write(dir.path().join("sub-103.csv"), "").unwrap();

        let folders = gather_folders(dir.path(), "sub-").unwrap();
        assert_eq!(folders.len(), 2);
    }
}
