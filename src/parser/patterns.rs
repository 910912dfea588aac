//! Compiled filename patterns.

use regex::Regex;
use std::sync::LazyLock;

/// Compiles a static pattern on first use.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// `sub-<n>` or `sub<n>`.
pub(super) static SUBJECT: LazyLock<Regex> = lazy_regex!(r"(?i)sub-?(\d+)");

/// `ses-<n>`, `session-<n>`, hyphen optional.
pub(super) static SESSION: LazyLock<Regex> = lazy_regex!(r"(?i)(?:ses|session)-?(\d+)");

/// `session-<letter>_<n>`: the letter encodes the run. ASCII letters only.
pub(super) static SESSION_LETTER: LazyLock<Regex> =
    lazy_regex!(r"(?i)session-((?-u:[a-z]))_(\d+)");

/// `run-<n>` or `run<n>`.
pub(super) static RUN: LazyLock<Regex> = lazy_regex!(r"(?i)run-?(\d+)");

/// `dyad-<dyad>-D<task>_session-<n>`.
pub(super) static ARTWORK_DYAD: LazyLock<Regex> =
    lazy_regex!(r"(?i)dyad-(\d+)-D(\d+)_session-(\d+)");

/// `sub-<n>-solo_session-<n>`.
pub(super) static ARTWORK_SOLO: LazyLock<Regex> = lazy_regex!(r"(?i)sub-(\d+)-solo_session-(\d+)");

/// Whole folder name `sub-<n>_session-<n>`.
pub(super) static COORDINATES_FOLDER: LazyLock<Regex> =
    lazy_regex!(r"(?i)^sub-(\d+)_session-(\d+)$");

/// `dyad-<dyad>_session-<n>_task-<t>`; `_` or `-` between blocks.
pub(super) static MOCAP: LazyLock<Regex> =
    lazy_regex!(r"(?i)dyad-?(\d+)[_-]+(?:ses|session)-?(\d+)[_-]+task-?(\d+)");
