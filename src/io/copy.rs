//! Byte copier.

use super::json::write_json;
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Copies `source` to `target_dir/file_name`, creating directories as needed.
///
/// When `sidecar` is given it is written next to the copy as
/// `<stem>.json`. Existing files are overwritten. Returns the paths written,
/// copy first.
pub fn copy_with_sidecar(
    source: &Path,
    target_dir: &Path,
    file_name: &str,
    sidecar: Option<&Value>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(target_dir).map_err(|e| {
        Error::operation("create_dir", format!("{}: {e}", target_dir.display()))
    })?;

    let target = target_dir.join(file_name);
    std::fs::copy(source, &target).map_err(|e| {
        Error::operation(
            "copy_file",
            format!("{} -> {}: {e}", source.display(), target.display()),
        )
    })?;

    let mut written = vec![target];
    if let Some(data) = sidecar {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let sidecar_path = target_dir.join(format!("{stem}.json"));
        write_json(&sidecar_path, data)?;
        written.push(sidecar_path);
    }

    Ok(written)
}
