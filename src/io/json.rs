//! JSON sidecar reading and writing.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

/// Reads a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::operation("read_json", format!("{}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::operation("parse_json", format!("{}: {e}", path.display())))
}

/// Writes a value as JSON indented by four spaces, overwriting `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::operation("serialize_json", e))?;
    buf.push(b'\n');

    std::fs::write(path, buf)
        .map_err(|e| Error::operation("write_json", format!("{}: {e}", path.display())))
}
