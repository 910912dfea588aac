//! Per-item conversion outcomes.

use crate::Error;
use std::path::{Path, PathBuf};

/// Result of converting one candidate file or folder.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// At least one artifact was written.
    Success {
        /// The candidate that was converted.
        source: PathBuf,
        /// Every file written for it.
        destinations: Vec<PathBuf>,
    },
    /// The candidate was not meant for this category.
    Skipped {
        /// The candidate.
        source: PathBuf,
        /// Why it was skipped.
        reason: String,
    },
    /// Converting the candidate failed.
    Failed {
        /// The candidate.
        source: PathBuf,
        /// The underlying error.
        error: Error,
    },
}

impl ConversionOutcome {
    /// Returns the candidate this outcome belongs to.
    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. }
            | Self::Skipped { source, .. }
            | Self::Failed { source, .. } => source,
        }
    }

    /// Returns whether the candidate was converted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns whether the candidate failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
