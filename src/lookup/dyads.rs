//! Dyad list: which two participants drew together.

use super::{LoadError, column, csv_reader, field, open_table};
use crate::models::normalize_id;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Subject to dyad mapping, keyed by integer-normalised subject id.
///
/// Built by pivoting the wide `dyadID, pID1, pID2` table into long form.
/// A subject listed twice keeps its last dyad.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DyadTable {
    by_subject: HashMap<String, String>,
}

impl DyadTable {
    /// Loads the dyad list from a CSV file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut reader = open_table(path)?;
        Self::from_csv(&mut reader)
    }

    /// Parses the dyad list from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::from_csv(&mut csv_reader(reader))
    }

    fn from_csv<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, LoadError> {
        let mut table = Self::default();
        for row in read_rows(reader)? {
            for subject in row.members {
                table.insert(&subject, &row.dyad);
            }
        }
        Ok(table)
    }

    /// Maps a subject to a dyad, normalising the subject id.
    ///
    /// Non-numeric ids are stored as given.
    pub fn insert(&mut self, subject: &str, dyad: &str) {
        let key = normalize_id(subject).unwrap_or_else(|| subject.trim().to_string());
        self.by_subject.insert(key, dyad.trim().to_string());
    }

    /// Looks up the dyad of a subject. `"07"` and `"7"` are the same subject.
    #[must_use]
    pub fn get(&self, subject: &str) -> Option<&str> {
        let key = normalize_id(subject)?;
        self.by_subject.get(&key).map(String::as_str)
    }

    /// Number of subjects mapped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_subject.len()
    }

    /// Returns whether no subject is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_subject.is_empty()
    }
}

impl<S: AsRef<str>, D: AsRef<str>> FromIterator<(S, D)> for DyadTable {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (subject, dyad) in iter {
            table.insert(subject.as_ref(), dyad.as_ref());
        }
        table
    }
}

/// Dyad to member subjects, in table order.
///
/// Member ids are integer-normalised; blank members are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DyadGrouping {
    members: BTreeMap<String, Vec<String>>,
}

impl DyadGrouping {
    /// Loads the grouping from the dyad list CSV.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut reader = open_table(path)?;
        Self::from_csv(&mut reader)
    }

    /// Parses the grouping from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::from_csv(&mut csv_reader(reader))
    }

    fn from_csv<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, LoadError> {
        let members = read_rows(reader)?
            .into_iter()
            .map(|row| (row.dyad, row.members))
            .collect();
        Ok(Self { members })
    }

    /// Returns the members of a dyad.
    #[must_use]
    pub fn members(&self, dyad: &str) -> Option<&[String]> {
        self.members.get(dyad).map(Vec::as_slice)
    }

    /// Iterates dyads in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.members
            .iter()
            .map(|(dyad, members)| (dyad.as_str(), members.as_slice()))
    }

    /// Number of dyads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the grouping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One dyad list row after normalisation.
struct DyadRow {
    dyad: String,
    members: Vec<String>,
}

fn read_rows<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<DyadRow>, LoadError> {
    let headers = reader.headers()?.clone();
    let dyad_col = column(&headers, "dyadID")?;
    let member_cols = [column(&headers, "pID1")?, column(&headers, "pID2")?];

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let Some(dyad) = field(&record, dyad_col) else {
            continue;
        };

        let mut members = Vec::with_capacity(member_cols.len());
        for col in member_cols {
            let Some(raw) = field(&record, col) else {
                continue;
            };
            let subject = normalize_id(raw).ok_or_else(|| LoadError::MalformedRow {
                row: i + 1,
                cause: format!("participant id '{raw}' is not a number"),
            })?;
            members.push(subject);
        }

        rows.push(DyadRow {
            dyad: dyad.to_string(),
            members,
        });
    }
    Ok(rows)
}
