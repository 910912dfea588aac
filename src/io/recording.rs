//! Recording reader/writer.

use super::json::write_json;
use crate::bids::{BidsPath, NA, ParticipantsTable, PARTICIPANTS_FILE, TsvTable};
use crate::models::SexCode;
use crate::{Error, Result};
use serde_json::json;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Leading bytes of every HDF5 file, and therefore every SNIRF file.
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'];

/// A recording loaded for conversion.
///
/// Only the header fields the converter rewrites are held in memory. The
/// payload stays at `source` until it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// File the recording was read from.
    pub source: PathBuf,
    /// Subject sex from the header, replaced by demographics when known.
    pub subject_sex: Option<SexCode>,
    /// Measurement date, ISO 8601.
    pub measurement_date: Option<String>,
    /// Whether the recording carries an optode montage.
    pub has_montage: bool,
}

/// Trait for recording format backends.
///
/// Writers must overwrite outputs from a previous run.
pub trait RecordingBackend {
    /// Reads a recording.
    fn read(&self, path: &Path) -> Result<Recording>;

    /// Writes a recording to its BIDS location; returns the data file path.
    fn write(&self, recording: &Recording, target: &BidsPath) -> Result<PathBuf>;
}

/// SNIRF backend.
///
/// The payload is copied unchanged; BIDS metadata lives in the sidecars,
/// the per-session scans table and `participants.tsv`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnirfBackend;

impl SnirfBackend {
    /// Creates a SNIRF backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_sidecars(recording: &Recording, target: &BidsPath, dir: &Path) -> Result<()> {
        let nirs_sidecar = target.sibling("nirs", ".json").basename()?;
        write_json(
            &dir.join(nirs_sidecar),
            &json!({
                "TaskName": target.task().unwrap_or(NA),
                "PowerLineFrequency": NA,
                "SoftwareFilters": NA,
            }),
        )?;

        if recording.has_montage {
            let coordsystem = target
                .without_task_and_run()
                .sibling("coordsystem", ".json")
                .basename()?;
            write_json(
                &dir.join(coordsystem),
                &json!({
                    "NIRSCoordinateSystem": "Other",
                    "NIRSCoordinateUnits": "m",
                }),
            )?;
        }
        Ok(())
    }

    fn update_participants(recording: &Recording, target: &BidsPath) -> Result<()> {
        let Some(subject) = target.subject() else {
            return Ok(());
        };
        std::fs::create_dir_all(target.root())
            .map_err(|e| Error::operation("create_dir", format!("{}: {e}", target.root().display())))?;

        let path = target.root().join(PARTICIPANTS_FILE);
        let mut participants = ParticipantsTable::open(&path)?;
        participants.upsert_subject(subject, recording.subject_sex);
        participants.save(&path)
    }

    fn update_scans(recording: &Recording, target: &BidsPath, data_file: &Path) -> Result<()> {
        let (Some(subject), Some(session)) = (target.subject(), target.session()) else {
            return Ok(());
        };
        let session_dir = target
            .root()
            .join(format!("sub-{subject}"))
            .join(format!("ses-{session}"));
        let path = session_dir.join(format!("sub-{subject}_ses-{session}_scans.tsv"));

        let mut scans = if path.exists() {
            TsvTable::read(&path)?
        } else {
            TsvTable::with_headers(&["filename", "acq_time"])
        };
        let name_col = scans.ensure_column("filename", NA);
        let time_col = scans.ensure_column("acq_time", NA);

        let relative = data_file
            .strip_prefix(&session_dir)
            .unwrap_or(data_file)
            .to_string_lossy()
            .replace('\\', "/");
        let row = scans
            .find_row(name_col, &relative)
            .unwrap_or_else(|| scans.push_row(name_col, &relative));
        scans.set(row, time_col, recording.measurement_date.as_deref().unwrap_or(NA));
        scans.write(&path)
    }
}

impl RecordingBackend for SnirfBackend {
    fn read(&self, path: &Path) -> Result<Recording> {
        let mut file = File::open(path)
            .map_err(|e| Error::operation("read_recording", format!("{}: {e}", path.display())))?;
        let mut signature = [0u8; HDF5_SIGNATURE.len()];
        file.read_exact(&mut signature).map_err(|e| {
            Error::operation("read_recording", format!("{}: {e}", path.display()))
        })?;
        if signature != HDF5_SIGNATURE {
            return Err(Error::operation(
                "read_recording",
                format!("{} is not an HDF5/SNIRF file", path.display()),
            ));
        }

        Ok(Recording {
            source: path.to_path_buf(),
            subject_sex: None,
            measurement_date: None,
            has_montage: true,
        })
    }

    fn write(&self, recording: &Recording, target: &BidsPath) -> Result<PathBuf> {
        let dir = target.directory()?;
        let data_file = target.fpath()?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::operation("create_dir", format!("{}: {e}", dir.display())))?;
        std::fs::copy(&recording.source, &data_file).map_err(|e| {
            Error::operation(
                "write_recording",
                format!("{} -> {}: {e}", recording.source.display(), data_file.display()),
            )
        })?;

        Self::write_sidecars(recording, target, &dir)?;
        Self::update_participants(recording, target)?;
        Self::update_scans(recording, target, &data_file)?;

        tracing::debug!(path = %data_file.display(), "Wrote recording");
        Ok(data_file)
    }
}
