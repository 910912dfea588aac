//! Post-conversion sidecar fixes.

use crate::Result;
use crate::io::{read_json, write_json};
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

/// Key the recording writer leaves out of coordinate-system sidecars.
pub const PROCESSING_DESCRIPTION_KEY: &str = "NIRSCoordinateProcessingDescription";

const COORDSYSTEM_SUFFIX: &str = "_coordsystem.json";

/// Adds `"NIRSCoordinateProcessingDescription": "n/a"` to every
/// `*_coordsystem.json` under `root` that lacks it.
///
/// Existing keys keep their order. Unreadable sidecars are logged and
/// skipped. Returns the number of files rewritten.
pub fn patch_coordsystem_sidecars(root: &Path) -> Result<usize> {
    let mut patched = 0;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_coordsystem = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(COORDSYSTEM_SUFFIX));
        if !is_coordsystem {
            continue;
        }

        let mut value = match read_json(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable coordsystem sidecar");
                continue;
            },
        };

        let Value::Object(map) = &mut value else {
            tracing::warn!(path = %path.display(), "Coordsystem sidecar is not a JSON object");
            continue;
        };
        if map.contains_key(PROCESSING_DESCRIPTION_KEY) {
            continue;
        }
        map.insert(
            PROCESSING_DESCRIPTION_KEY.to_string(),
            Value::String("n/a".to_string()),
        );
        write_json(path, &value)?;
        tracing::debug!(path = %path.display(), "Patched coordsystem sidecar");
        patched += 1;
    }

    tracing::info!(root = %root.display(), patched, "Patched coordsystem sidecars");
    Ok(patched)
}
