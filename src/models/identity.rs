//! Resolved output identities.

use super::identifier::{Field, TaskKind};
use serde::{Deserialize, Serialize};

/// Subject sex, using the recording header's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SexCode {
    /// Code 0.
    #[default]
    Unknown,
    /// Code 1.
    Male,
    /// Code 2.
    Female,
}

impl SexCode {
    /// Maps a free-text label. `male`/`m` and `female`/`f` are recognised,
    /// case-insensitively; anything else is `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Returns the integer code (0, 1 or 2).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Returns the value written to the `sex` column of `participants.tsv`.
    #[must_use]
    pub const fn bids_label(&self) -> &'static str {
        match self {
            Self::Unknown => "n/a",
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

/// Demographic record for one subject visit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Demographics {
    /// Age as written in the source table.
    pub age: Option<String>,
    /// Sex code.
    pub sex: SexCode,
}

/// Complete output identity for one source item.
///
/// Absent fields are normal; only the fields a driver requires are
/// validated, through [`ResolvedIdentity::missing`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Zero-padded subject number.
    pub subject: Option<String>,
    /// Zero-padded session number.
    pub session: Option<String>,
    /// Zero-padded run number.
    pub run: Option<String>,
    /// Dyad id.
    pub dyad: Option<String>,
    /// Task number.
    pub task_num: Option<String>,
    /// Artwork task kind.
    pub task_kind: TaskKind,
    /// `dyad<id>` when a dyad is known.
    pub acquisition_label: Option<String>,
    /// Demographics for this subject and session, if listed.
    pub demographics: Option<Demographics>,
}

impl ResolvedIdentity {
    /// Returns the value of an identifier field.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Subject => &self.subject,
            Field::Session => &self.session,
            Field::Run => &self.run,
            Field::Dyad => &self.dyad,
            Field::TaskNum => &self.task_num,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Returns the required fields that are absent, in the order given.
    #[must_use]
    pub fn missing(&self, required: &[Field]) -> Vec<Field> {
        required
            .iter()
            .copied()
            .filter(|f| self.field(*f).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_labels() {
        assert_eq!(SexCode::from_label("Male"), SexCode::Male);
        assert_eq!(SexCode::from_label("m"), SexCode::Male);
        assert_eq!(SexCode::from_label("FEMALE"), SexCode::Female);
        assert_eq!(SexCode::from_label("F"), SexCode::Female);
        assert_eq!(SexCode::from_label("other"), SexCode::Unknown);
        assert_eq!(SexCode::from_label(""), SexCode::Unknown);
        assert_eq!(SexCode::Female.code(), 2);
        assert_eq!(SexCode::Male.bids_label(), "M");
    }

    #[test]
    fn test_missing_preserves_order() {
        let identity = ResolvedIdentity {
            session: Some("01".to_string()),
            dyad: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            identity.missing(&[Field::Dyad, Field::Session, Field::TaskNum]),
            vec![Field::Dyad, Field::TaskNum]
        );
    }
}
