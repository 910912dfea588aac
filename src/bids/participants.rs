//! `participants.tsv` maintenance.

use super::tsv::{NA, TsvTable};
use crate::Result;
use crate::lookup::DemographicsTable;
use crate::models::{SexCode, normalize_id};
use std::path::Path;

/// File name of the participants table at the dataset root.
pub const PARTICIPANTS_FILE: &str = "participants.tsv";

const PARTICIPANT_ID: &str = "participant_id";
const AGE: &str = "age";
const SEX: &str = "sex";

/// The dataset's participants table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantsTable {
    table: TsvTable,
}

impl Default for ParticipantsTable {
    fn default() -> Self {
        Self {
            table: TsvTable::with_headers(&[PARTICIPANT_ID, AGE, SEX]),
        }
    }
}

impl ParticipantsTable {
    /// Reads the table at `path`, or starts a new one when absent.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut table = TsvTable::read(path)?;
        table.ensure_column(PARTICIPANT_ID, NA);
        Ok(Self { table })
    }

    /// Writes the table to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.table.write(path)
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns whether no participant is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Adds the subject if missing and records its sex when known.
    pub fn upsert_subject(&mut self, subject: &str, sex: Option<SexCode>) {
        let id_col = self.id_column();
        let participant = format!("sub-{subject}");
        let row = self
            .table
            .find_row(id_col, &participant)
            .unwrap_or_else(|| self.table.push_row(id_col, &participant));

        if let Some(sex) = sex {
            let sex_col = self.table.ensure_column(SEX, NA);
            self.table.set(row, sex_col, sex.bids_label());
        }
    }

    /// Fills the age column from the demographics table.
    ///
    /// Rows are matched by integer-normalised subject id; only listed rows
    /// are touched and no rows are added. Returns how many rows got an age.
    pub fn back_fill_age(&mut self, demographics: &DemographicsTable) -> usize {
        let id_col = self.id_column();
        let age_col = self.table.ensure_column(AGE, NA);

        let mut updated = 0;
        for row in 0..self.table.len() {
            let Some(subject) = self
                .table
                .get(row, id_col)
                .map(|id| id.trim_start_matches("sub-"))
                .and_then(normalize_id)
            else {
                continue;
            };
            if let Some(age) = demographics.age_for_subject(&subject) {
                let age = age.to_string();
                self.table.set(row, age_col, &age);
                updated += 1;
            }
        }
        updated
    }

    /// Age recorded for a participant id such as `sub-07`.
    #[must_use]
    pub fn age_of(&self, participant: &str) -> Option<&str> {
        self.cell(participant, AGE)
    }

    /// Sex recorded for a participant id such as `sub-07`.
    #[must_use]
    pub fn sex_of(&self, participant: &str) -> Option<&str> {
        self.cell(participant, SEX)
    }

    fn cell(&self, participant: &str, column: &str) -> Option<&str> {
        let col = self.table.column(column)?;
        let row = self.table.find_row(self.table.column(PARTICIPANT_ID)?, participant)?;
        self.table.get(row, col)
    }

    fn id_column(&mut self) -> usize {
        self.table.ensure_column(PARTICIPANT_ID, NA)
    }
}

/// Back-fills ages into the participants table at `root`, if it exists.
pub fn back_fill_participant_ages(root: &Path, demographics: &DemographicsTable) -> Result<usize> {
    let path = root.join(PARTICIPANTS_FILE);
    if !path.exists() {
        return Ok(0);
    }
    let mut participants = ParticipantsTable::open(&path)?;
    let updated = participants.back_fill_age(demographics);
    participants.save(&path)?;
    tracing::info!(path = %path.display(), updated, "Updated participant ages");
    Ok(updated)
}
