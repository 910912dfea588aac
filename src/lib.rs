//! # nirs-bids
//!
//! Organizes a study's fNIRS recordings and companion artifacts (artwork
//! scans, optode coordinate bundles, motion-capture tables) into a BIDS
//! dataset.
//!
//! The interesting part is the identifier engine: loosely named source files
//! are parsed into subject/session/run/dyad identifiers, joined against the
//! study's dyad list and demographics table, and turned into canonical BIDS
//! names. Reading and writing the scientific formats sits behind narrow
//! collaborator traits in [`io`].
//!
//! ## Pipeline
//!
//! ```text
//! filename ─► FilenameParser ─► RawIdentifier ─► MetadataResolver ─► ResolvedIdentity
//!                 ▲                                    ▲                    │
//!                 └──────────── LookupTables ──────────┘                    ▼
//!                                                         Converter (per category)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nirs_bids::lookup::DyadTable;
//! use nirs_bids::parser::FilenameParser;
//!
//! let dyads = DyadTable::default();
//! let parser = FilenameParser::new(&dyads);
//! let id = parser.parse_standard("sub-7_session-b_2.snirf").unwrap_or_default();
//! assert_eq!(id.subject.as_deref(), Some("07"));
//! assert_eq!(id.session.as_deref(), Some("02"));
//! assert_eq!(id.run.as_deref(), Some("02"));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod bids;
pub mod config;
pub mod converters;
pub mod io;
pub mod lookup;
pub mod models;
pub mod observability;
pub mod parser;
pub mod pipeline;
pub mod resolver;

// Re-exports for convenience
pub use config::StudyConfig;
pub use converters::{CategoryReport, Converter, LoggingObserver, ProgressObserver, run_converter};
pub use lookup::{DemographicsTable, DyadTable, LookupTables};
pub use models::{
    Category, ConversionOutcome, Demographics, Field, MocapTask, ParseMode, RawIdentifier,
    ResolvedIdentity, SexCode, TaskKind,
};
pub use parser::FilenameParser;
pub use resolver::MetadataResolver;

/// Error type for conversion operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad CLI arguments, unconfigured category keys, malformed config values |
/// | `OperationFailed` | Filesystem, CSV or JSON I/O fails inside a collaborator |
/// | `MissingFields` | Required identifiers are absent after parsing and resolving |
/// | `UnrecognizedName` | A file or folder name matches none of its category's patterns |
/// | `UnknownTask` | A motion-capture task number is outside the known task table |
/// | `NoMatchingFiles` | A coordinates folder holds none of the expected files |
/// | `ConfigNotFound` | The study configuration file does not exist |
/// | `SourceNotFound` | A requested category's source directory does not exist |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised by the I/O collaborators: copying, sidecar writes, TSV
    /// rewrites, recording reads.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Required identifier fields are missing.
    #[error("missing {missing:?} for {context}")]
    MissingFields {
        /// What was being validated (e.g. `"Solo"`, `"MoCap"`).
        context: String,
        /// Names of the missing keys.
        missing: Vec<String>,
    },

    /// A name matched no known pattern for its category.
    #[error("unrecognized {category} name: {name}")]
    UnrecognizedName {
        /// Category whose patterns were tried.
        category: String,
        /// The file or folder name.
        name: String,
    },

    /// Motion-capture task number outside the task table.
    #[error("unknown task number '{0}'")]
    UnknownTask(String),

    /// A source folder contained none of the expected files.
    #[error("no matching files in {0}")]
    NoMatchingFiles(String),

    /// The study configuration file is missing.
    #[error("config file missing at {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A requested category's source directory is missing.
    #[error("source folder for {category} not found: {}", .path.display())]
    SourceNotFound {
        /// Category key.
        category: String,
        /// The resolved source directory.
        path: PathBuf,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns whether this error is fatal to the whole run.
    ///
    /// Everything else is confined to a single file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigNotFound(_) | Self::SourceNotFound { .. })
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
