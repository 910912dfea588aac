//! BIDS entity paths.

use crate::{Error, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Builder for a BIDS file location.
///
/// Entities are emitted in BIDS order: `sub`, `ses`, `task`, `acq`, `run`.
///
/// ```rust
/// use nirs_bids::bids::BidsPath;
///
/// let path = BidsPath::new("out")
///     .with_subject("01")
///     .with_session("02")
///     .with_task("drawing")
///     .with_acquisition(Some("dyad1001"))
///     .with_run("01")
///     .with_datatype("nirs")
///     .with_suffix("nirs")
///     .with_extension(".snirf");
/// assert_eq!(
///     path.basename().unwrap(),
///     "sub-01_ses-02_task-drawing_acq-dyad1001_run-01_nirs.snirf"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidsPath {
    root: PathBuf,
    subject: Option<String>,
    session: Option<String>,
    task: Option<String>,
    acquisition: Option<String>,
    run: Option<String>,
    datatype: Option<String>,
    suffix: Option<String>,
    extension: Option<String>,
}

impl BidsPath {
    /// Creates a path under a dataset root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Sets the subject label.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the session label.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Sets the task label.
    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Sets or clears the acquisition label.
    #[must_use]
    pub fn with_acquisition(mut self, acquisition: Option<&str>) -> Self {
        self.acquisition = acquisition.map(String::from);
        self
    }

    /// Sets the run label.
    #[must_use]
    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.run = Some(run.into());
        self
    }

    /// Sets the datatype folder (`nirs`, `eeg`, ...).
    #[must_use]
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    /// Sets the filename suffix (`nirs`, `coordsystem`, ...).
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Sets the extension, including the leading dot.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Dataset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subject label, if set.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Session label, if set.
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Task label, if set.
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }

    /// The file name, e.g. `sub-01_ses-01_task-drawing_run-01_nirs.snirf`.
    pub fn basename(&self) -> Result<String> {
        let subject = self.require(self.subject.as_deref(), "subject")?;
        let suffix = self.require(self.suffix.as_deref(), "suffix")?;

        let mut name = format!("sub-{subject}");
        let entities = [
            ("ses", &self.session),
            ("task", &self.task),
            ("acq", &self.acquisition),
            ("run", &self.run),
        ];
        for (key, value) in entities {
            if let Some(value) = value {
                let _ = write!(name, "_{key}-{value}");
            }
        }
        name.push('_');
        name.push_str(suffix);
        if let Some(ext) = &self.extension {
            name.push_str(ext);
        }
        Ok(name)
    }

    /// The folder holding the file: `<root>/sub-<s>[/ses-<s>][/<datatype>]`.
    pub fn directory(&self) -> Result<PathBuf> {
        let subject = self.require(self.subject.as_deref(), "subject")?;
        let mut dir = self.root.join(format!("sub-{subject}"));
        if let Some(session) = &self.session {
            dir.push(format!("ses-{session}"));
        }
        if let Some(datatype) = &self.datatype {
            dir.push(datatype);
        }
        Ok(dir)
    }

    /// Full path to the file.
    pub fn fpath(&self) -> Result<PathBuf> {
        Ok(self.directory()?.join(self.basename()?))
    }

    /// Returns a copy with a different suffix and extension, keeping entities.
    #[must_use]
    pub fn sibling(&self, suffix: &str, extension: &str) -> Self {
        self.clone().with_suffix(suffix).with_extension(extension)
    }

    /// Returns a copy without the task and run entities.
    #[must_use]
    pub fn without_task_and_run(&self) -> Self {
        Self {
            task: None,
            run: None,
            ..self.clone()
        }
    }

    fn require<'s>(&self, value: Option<&'s str>, entity: &str) -> Result<&'s str> {
        value.filter(|v| !v.is_empty()).ok_or_else(|| {
            Error::InvalidInput(format!("BIDS path under {} has no {entity}", self.root.display()))
        })
    }
}
