//! Read-side lookups over a converted dataset.

use crate::lookup::DyadGrouping;
use crate::models::zero_pad;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Two members' recordings of the same dyad session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DyadPair {
    /// Dyad id.
    pub dyad: String,
    /// Session label.
    pub session: String,
    /// Recording of the first listed member.
    pub first: PathBuf,
    /// Recording of the second listed member.
    pub second: PathBuf,
}

/// Lists `_nirs.snirf` recordings of one subject session and task.
///
/// Matches regardless of acquisition label or run. Returns an empty list
/// when the session folder does not exist.
pub fn recordings_for(root: &Path, subject: &str, session: &str, task: &str) -> Result<Vec<PathBuf>> {
    let dir = root
        .join(format!("sub-{subject}"))
        .join(format!("ses-{session}"))
        .join("nirs");
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("sub-{subject}_ses-{session}_task-{task}_");
    let mut found: Vec<PathBuf> = read_dir(&dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with("_nirs.snirf"))
        })
        .collect();
    found.sort();
    Ok(found)
}

/// Session labels present for a subject, sorted.
pub fn sessions_for(root: &Path, subject: &str) -> Result<Vec<String>> {
    let dir = root.join(format!("sub-{subject}"));
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<String> = read_dir(&dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix("ses-"))
                .map(String::from)
        })
        .collect();
    sessions.sort();
    Ok(sessions)
}

/// Pairs the recordings of both members of every two-person dyad.
///
/// Sessions are taken from the first member. A pair is emitted only when
/// both members have a recording for that session and task.
pub fn dyad_pairs(root: &Path, grouping: &DyadGrouping, task: &str) -> Result<Vec<DyadPair>> {
    let mut pairs = Vec::new();

    for (dyad, members) in grouping.iter() {
        let [first, second] = members else {
            tracing::debug!(dyad, members = members.len(), "Skipping dyad without exactly two members");
            continue;
        };
        let (Some(first), Some(second)) = (zero_pad(first), zero_pad(second)) else {
            continue;
        };

        for session in sessions_for(root, &first)? {
            let a = recordings_for(root, &first, &session, task)?;
            let b = recordings_for(root, &second, &session, task)?;
            if let (Some(a), Some(b)) = (a.into_iter().next(), b.into_iter().next()) {
                pairs.push(DyadPair {
                    dyad: dyad.to_string(),
                    session,
                    first: a,
                    second: b,
                });
            }
        }
    }

    Ok(pairs)
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::operation("read_dir", format!("{}: {e}", dir.display())))?;
    Ok(entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
}
