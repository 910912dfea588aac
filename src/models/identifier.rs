//! Parsed filename identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Artwork task kind. Other categories leave it at `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Drawn by both members of a dyad.
    Together,
    /// Drawn by a single participant.
    Solo,
    /// Not an artwork, or not determined.
    #[default]
    Unknown,
}

/// Structured identifier extracted from a file or folder name.
///
/// Produced fresh per name and consumed by the resolver. Subject, session
/// and run are canonical (at least two digits); dyad ids are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawIdentifier {
    /// Zero-padded subject number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Zero-padded session number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// Zero-padded run number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Dyad id, from the name itself or the dyad table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dyad: Option<String>,
    /// Task number within the dyad's protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_num: Option<String>,
    /// Artwork task kind.
    pub task_kind: TaskKind,
}

/// Identifier keys that a driver may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Subject number.
    Subject,
    /// Session number.
    Session,
    /// Run number.
    Run,
    /// Dyad id.
    Dyad,
    /// Task number.
    TaskNum,
}

impl Field {
    /// Returns the key name used in validation messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "sub",
            Self::Session => "ses",
            Self::Run => "run",
            Self::Dyad => "dyad",
            Self::TaskNum => "task_num",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Motion-capture tasks, keyed by their protocol number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MocapTask {
    /// Task 1.
    DrawingAlone,
    /// Task 2.
    CoDrawing1,
    /// Task 3.
    CoDrawing2,
    /// Task 4.
    CollaborativeTask,
}

impl MocapTask {
    /// Looks up a task by its number. Leading zeros are ignored.
    #[must_use]
    pub fn from_number(number: &str) -> Option<Self> {
        match number.trim().parse::<u32>().ok()? {
            1 => Some(Self::DrawingAlone),
            2 => Some(Self::CoDrawing1),
            3 => Some(Self::CoDrawing2),
            4 => Some(Self::CollaborativeTask),
            _ => None,
        }
    }

    /// Returns the BIDS task label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DrawingAlone => "drawingalone",
            Self::CoDrawing1 => "codrawing1",
            Self::CoDrawing2 => "codrawing2",
            Self::CollaborativeTask => "collaborativetask",
        }
    }
}

impl fmt::Display for MocapTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mocap_task_table() {
        assert_eq!(MocapTask::from_number("1"), Some(MocapTask::DrawingAlone));
        assert_eq!(MocapTask::from_number("02"), Some(MocapTask::CoDrawing1));
        assert_eq!(MocapTask::from_number("3"), Some(MocapTask::CoDrawing2));
        assert_eq!(
            MocapTask::from_number("4").map(|t| t.as_str()),
            Some("collaborativetask")
        );
        assert_eq!(MocapTask::from_number("9"), None);
        assert_eq!(MocapTask::from_number("x"), None);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let id = RawIdentifier {
            subject: Some("07".to_string()),
            session: Some("01".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"subject":"07","session":"01","task_kind":"unknown"}"#
        );
    }
}
