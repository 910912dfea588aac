//! Numeric identifier canonicalisation.
//!
//! Identifiers travel in two shapes: zero-padded for names written to disk
//! (`"07"`) and integer-normalised for table keys (`"7"`).

/// Strips leading zeros by an integer round trip.
///
/// Returns `None` when the input is not a non-negative integer.
#[must_use]
pub fn normalize_id(raw: &str) -> Option<String> {
    raw.trim().parse::<u64>().ok().map(|n| n.to_string())
}

/// Formats an integer identifier with at least two digits.
///
/// Returns `None` when the input is not a non-negative integer.
#[must_use]
pub fn zero_pad(raw: &str) -> Option<String> {
    raw.trim().parse::<u64>().ok().map(|n| format!("{n:02}"))
}
