//! Participant demographics, keyed by subject visit.

use super::{LoadError, column, csv_reader, field, open_table};
use crate::models::{Demographics, SexCode, normalize_id, zero_pad};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Demographics keyed by `"{subject}_{session}"`, e.g. `"7_01"`.
///
/// The subject part is integer-normalised and the session part padded to
/// two digits, so the key is independent of how either was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemographicsTable {
    by_visit: HashMap<String, Demographics>,
}

impl DemographicsTable {
    /// Loads the demographics table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut reader = open_table(path)?;
        Self::from_csv(&mut reader)
    }

    /// Parses the demographics table from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::from_csv(&mut csv_reader(reader))
    }

    fn from_csv<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, LoadError> {
        let headers = reader.headers()?.clone();
        let id_col = column(&headers, "p_id")?;
        let visit_col = column(&headers, "visit")?;
        let gender_col = column(&headers, "gender")?;
        let age_col = column(&headers, "age")?;

        let mut table = Self::default();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = i + 1;

            let malformed = |what: &str, value: Option<&str>| LoadError::MalformedRow {
                row,
                cause: format!("{what} '{}' is not a number", value.unwrap_or("")),
            };

            let p_id = field(&record, id_col);
            let visit = field(&record, visit_col);
            let key = Self::key(
                p_id.ok_or_else(|| malformed("p_id", p_id))?,
                visit.ok_or_else(|| malformed("visit", visit))?,
            )
            .ok_or_else(|| malformed("p_id/visit", p_id))?;

            let demographics = Demographics {
                age: field(&record, age_col).map(String::from),
                sex: field(&record, gender_col).map_or(SexCode::Unknown, SexCode::from_label),
            };
            table.by_visit.insert(key, demographics);
        }
        Ok(table)
    }

    /// Builds the lookup key for a subject visit.
    #[must_use]
    pub fn key(subject: &str, session: &str) -> Option<String> {
        Some(format!("{}_{}", normalize_id(subject)?, zero_pad(session)?))
    }

    /// Looks up demographics for a subject visit.
    #[must_use]
    pub fn get(&self, subject: &str, session: &str) -> Option<&Demographics> {
        self.by_visit.get(&Self::key(subject, session)?)
    }

    /// Looks up by a prebuilt key such as `"7_01"`.
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Demographics> {
        self.by_visit.get(key)
    }

    /// Returns the first known age for a subject across all visits,
    /// preferring the earliest session.
    #[must_use]
    pub fn age_for_subject(&self, subject: &str) -> Option<&str> {
        let subject = normalize_id(subject)?;
        let mut visits: Vec<(&String, &Demographics)> = self
            .by_visit
            .iter()
            .filter(|(key, _)| key.split('_').next() == Some(subject.as_str()))
            .collect();
        visits.sort_by(|a, b| a.0.cmp(b.0));
        visits.into_iter().find_map(|(_, d)| d.age.as_deref())
    }

    /// Inserts a record.
    pub fn insert(&mut self, subject: &str, session: &str, demographics: Demographics) {
        if let Some(key) = Self::key(subject, session) {
            self.by_visit.insert(key, demographics);
        }
    }

    /// Number of subject visits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_visit.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_visit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_row_is_keyed_by_subject_visit() {
        let input = "p_id,visit,gender,age\n07,1,F,34\n";
        let table = DemographicsTable::from_reader(Cursor::new(input)).unwrap();

        let expected = Demographics {
            age: Some("34".to_string()),
            sex: SexCode::Female,
        };
        assert_eq!(table.get_key("7_01"), Some(&expected));
        assert_eq!(table.get("07", "01"), Some(&expected));
        assert_eq!(table.get("7", "2"), None);
    }

    #[test]
    fn test_unknown_gender_and_blank_age() {
        let input = "p_id,visit,gender,age\n101,2,nonbinary,\n102,1,,40\n";
        let table = DemographicsTable::from_reader(Cursor::new(input)).unwrap();

        let first = table.get_key("101_02").unwrap();
        assert_eq!(first.sex, SexCode::Unknown);
        assert_eq!(first.age, None);
        assert_eq!(table.get_key("102_01").unwrap().sex, SexCode::Unknown);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let input = "age,gender,visit,p_id,notes\n29,male,01,5,x\n";
        let table = DemographicsTable::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(table.get_key("5_01").unwrap().sex, SexCode::Male);
    }

    #[test]
    fn test_missing_column() {
        let input = "p_id,visit,sex,age\n5,1,m,29\n";
        let err = DemographicsTable::from_reader(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "gender"));
    }

    #[test]
    fn test_non_numeric_visit_is_malformed() {
        let input = "p_id,visit,gender,age\n5,first,m,29\n";
        let err = DemographicsTable::from_reader(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_age_for_subject_prefers_earliest_visit() {
        let input = "p_id,visit,gender,age\n5,2,m,30\n5,1,m,29\n6,1,f,\n";
        let table = DemographicsTable::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(table.age_for_subject("05"), Some("29"));
        assert_eq!(table.age_for_subject("6"), None);
        assert_eq!(table.age_for_subject("7"), None);
    }
}
