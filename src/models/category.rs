//! Source-file categories and parsing modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source-file categories, one conversion driver each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// fNIRS recordings (`.snirf`).
    #[serde(rename = "NIRS")]
    Nirs,
    /// Scanned or photographed artworks.
    #[serde(rename = "Art")]
    Artwork,
    /// Per-session optode coordinate folders.
    #[serde(rename = "Coord")]
    Coordinates,
    /// Motion-capture tables.
    #[serde(rename = "MoCap")]
    MoCap,
}

impl Category {
    /// Returns all categories in pipeline order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Nirs, Self::Artwork, Self::Coordinates, Self::MoCap]
    }

    /// Returns the key used under `Sources` and `Destination` in the study config.
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::Nirs => "NIRS",
            Self::Artwork => "Art",
            Self::Coordinates => "Coord",
            Self::MoCap => "MoCap",
        }
    }

    /// File extensions collected for this category, lowercase and without dot.
    ///
    /// Coordinates are gathered as folders and return an empty slice.
    #[must_use]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Nirs => &["snirf"],
            Self::Artwork => &["tif", "tiff", "jpg", "png"],
            Self::Coordinates => &[],
            Self::MoCap => &["csv"],
        }
    }

    /// Returns the parsing mode the driver for this category uses.
    #[must_use]
    pub const fn parse_mode(&self) -> ParseMode {
        match self {
            Self::Nirs => ParseMode::Standard,
            Self::Artwork => ParseMode::Artwork,
            Self::Coordinates => ParseMode::Coordinates,
            Self::MoCap => ParseMode::MoCap,
        }
    }

    /// Parses a category from a config key or a CLI spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nirs" | "fnirs" | "snirf" => Some(Self::Nirs),
            "art" | "artwork" | "artworks" => Some(Self::Artwork),
            "coord" | "coords" | "coordinates" => Some(Self::Coordinates),
            "mocap" | "motion" | "motion-capture" => Some(Self::MoCap),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_key())
    }
}

/// Filename parsing modes. Selected by the driver, never detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// `sub-<n>` plus `ses-<n>`/`session-<n>`, optional run.
    Standard,
    /// Dyad (`dyad-<d>-D<t>_session-<n>`) or solo (`sub-<n>-solo_session-<n>`).
    Artwork,
    /// Folder names of the form `sub-<n>_session-<n>`.
    Coordinates,
    /// `dyad-<d>_session-<n>_task-<t>`.
    MoCap,
}

impl ParseMode {
    /// Parses a mode name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "nirs" | "recording" => Some(Self::Standard),
            "artwork" | "art" => Some(Self::Artwork),
            "coordinates" | "coord" | "folder" => Some(Self::Coordinates),
            "mocap" | "motion" => Some(Self::MoCap),
            _ => None,
        }
    }
}
