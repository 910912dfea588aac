//! Filename identifier parser.
//!
//! Extracts subject, session, run, dyad and task identifiers from the
//! loosely structured names the source studies produced. Four modes exist,
//! one per category; the driver picks the mode, nothing is inferred from
//! file contents.
//!
//! | Mode | Example | Yields |
//! |------|---------|--------|
//! | Standard | `sub-101_session-2.snirf` | sub `101`, ses `02`, run `01` |
//! | Standard | `sub-7_session-b_1.snirf` | sub `07`, ses `01`, run `02` |
//! | Artwork | `dyad-1001-D2_session-3.tif` | dyad `1001`, task `2`, ses `03` |
//! | Artwork | `sub-102-solo_session-1.jpg` | sub `102`, ses `01`, dyad from table |
//! | Coordinates | `sub-101_session-1` (folder) | sub `101`, ses `01`, dyad from table |
//! | Motion capture | `dyad-1001_session-1_task-2.csv` | dyad `1001`, ses `01`, task `2` |
//!
//! Tag words match case-insensitively. Numeric captures go through an
//! integer round trip, so padding in the input never leaks into the output.

mod patterns;

use crate::lookup::DyadTable;
use crate::models::{ParseMode, RawIdentifier, TaskKind, normalize_id, zero_pad};
use patterns::{
    ARTWORK_DYAD, ARTWORK_SOLO, COORDINATES_FOLDER, MOCAP, RUN, SESSION, SESSION_LETTER, SUBJECT,
};

/// Run assigned to recordings that carry no run information.
pub const DEFAULT_RUN: &str = "01";

/// Parser over source names.
///
/// Stateless apart from the borrowed dyad table, which fills in the dyad of
/// solo artworks and coordinate folders.
#[derive(Debug, Clone, Copy)]
pub struct FilenameParser<'a> {
    dyads: &'a DyadTable,
}

impl<'a> FilenameParser<'a> {
    /// Creates a parser that resolves dyads through `dyads`.
    #[must_use]
    pub const fn new(dyads: &'a DyadTable) -> Self {
        Self { dyads }
    }

    /// Parses a name in the given mode.
    #[must_use]
    pub fn parse(&self, mode: ParseMode, name: &str) -> Option<RawIdentifier> {
        match mode {
            ParseMode::Standard => self.parse_standard(name),
            ParseMode::Artwork => self.parse_artwork(name),
            ParseMode::Coordinates => self.parse_coordinates_folder(name),
            ParseMode::MoCap => self.parse_mocap(name),
        }
    }

    /// Parses a recording filename.
    ///
    /// Both a subject and a session tag are required; without either the
    /// whole name is rejected. Every accepted name gets a run.
    #[must_use]
    pub fn parse_standard(&self, name: &str) -> Option<RawIdentifier> {
        let subject = parse_subject(name)?;
        let session = parse_session(name)?;

        Some(RawIdentifier {
            subject: Some(subject),
            session: Some(session),
            run: Some(parse_run(name)),
            ..Default::default()
        })
    }

    /// Parses an artwork filename, trying the dyad pattern before the solo one.
    #[must_use]
    pub fn parse_artwork(&self, name: &str) -> Option<RawIdentifier> {
        if let Some(caps) = ARTWORK_DYAD.captures(name) {
            return Some(RawIdentifier {
                dyad: Some(caps[1].to_string()),
                task_num: Some(normalize_id(&caps[2])?),
                session: Some(zero_pad(&caps[3])?),
                task_kind: TaskKind::Together,
                ..Default::default()
            });
        }

        let caps = ARTWORK_SOLO.captures(name)?;
        let subject = &caps[1];
        Some(RawIdentifier {
            subject: Some(zero_pad(subject)?),
            session: Some(zero_pad(&caps[2])?),
            dyad: self.dyad_of(subject),
            task_kind: TaskKind::Solo,
            ..Default::default()
        })
    }

    /// Parses a coordinates folder name. The whole name must match.
    #[must_use]
    pub fn parse_coordinates_folder(&self, folder: &str) -> Option<RawIdentifier> {
        let caps = COORDINATES_FOLDER.captures(folder)?;
        let subject = &caps[1];
        Some(RawIdentifier {
            subject: Some(zero_pad(subject)?),
            session: Some(zero_pad(&caps[2])?),
            dyad: self.dyad_of(subject),
            ..Default::default()
        })
    }

    /// Parses a motion-capture filename.
    ///
    /// The task number is returned as written (minus leading zeros); mapping
    /// it to a task name is the driver's job.
    #[must_use]
    pub fn parse_mocap(&self, name: &str) -> Option<RawIdentifier> {
        let caps = MOCAP.captures(name)?;
        Some(RawIdentifier {
            dyad: Some(caps[1].to_string()),
            session: Some(zero_pad(&caps[2])?),
            task_num: Some(normalize_id(&caps[3])?),
            ..Default::default()
        })
    }

    fn dyad_of(&self, subject: &str) -> Option<String> {
        self.dyads.get(subject).map(String::from)
    }
}

/// Extracts the subject (`sub-01`, `sub01`) as a padded number.
#[must_use]
pub fn parse_subject(name: &str) -> Option<String> {
    SUBJECT.captures(name).and_then(|caps| zero_pad(&caps[1]))
}

/// Extracts the session as a padded number.
///
/// `session-<letter>_<n>` takes precedence over `ses-<n>`/`session-<n>`.
#[must_use]
pub fn parse_session(name: &str) -> Option<String> {
    if let Some(caps) = SESSION_LETTER.captures(name) {
        return zero_pad(&caps[2]);
    }
    SESSION.captures(name).and_then(|caps| zero_pad(&caps[1]))
}

/// Extracts the run, falling back to [`DEFAULT_RUN`].
///
/// The letter of `session-<letter>_<n>` encodes the run (`a` is 01, `b` is
/// 02, ...). Without it an explicit `run-<n>` tag is honoured.
#[must_use]
pub fn parse_run(name: &str) -> String {
    if let Some(caps) = SESSION_LETTER.captures(name) {
        if let Some(letter) = caps[1].chars().next() {
            let index = u32::from(letter.to_ascii_lowercase()) - u32::from('a') + 1;
            return format!("{index:02}");
        }
    }
    RUN.captures(name)
        .and_then(|caps| zero_pad(&caps[1]))
        .unwrap_or_else(|| DEFAULT_RUN.to_string())
}
