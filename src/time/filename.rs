//! Canonical filename timestamp parsing and formatting

use chrono::NaiveDateTime;
use std::path::Path;
use tracing::trace;

/// Canonical name pattern: `YYYY-MM-DD HH.MM.SS`
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

/// Month folder pattern: `YYYY-MM`
pub const MONTH_FOLDER_FORMAT: &str = "%Y-%m";

/// Parse the timestamp encoded in a canonical file name
///
/// The extension is stripped first. A trailing collision counter
/// (`2021-03-05 14.30.00_2.jpg`) is accepted as well.
pub fn parse_filename_time(path: &Path) -> Option<NaiveDateTime> {
    let name = path.file_name()?.to_str()?;
    let (stem, _) = split_name(name);
    let dt = parse_canonical_stem(stem)?;
    trace!(name, "Matched canonical pattern");
    Some(dt)
}

/// Split a file name into stem and extension (with its leading dot)
///
/// The extension starts at the last `.` of the name, so `.DS_Store` is all
/// extension. A name that is canonical as a whole (`2021-03-05 14.30.00`)
/// has no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    if parse_canonical_stem(name).is_some() {
        return (name, "");
    }

    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Parse `YYYY-MM-DD HH.MM.SS`, optionally followed by `_<n>`
fn parse_canonical_stem(stem: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(stem, CANONICAL_FORMAT) {
        return Some(dt);
    }

    let (base, counter) = stem.rsplit_once('_')?;
    if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDateTime::parse_from_str(base, CANONICAL_FORMAT).ok()
}

/// Format a timestamp as a canonical file stem
pub fn canonical_stem(timestamp: &NaiveDateTime) -> String {
    timestamp.format(CANONICAL_FORMAT).to_string()
}

/// Format a timestamp as a month folder name
pub fn month_folder(timestamp: &NaiveDateTime) -> String {
    timestamp.format(MONTH_FOLDER_FORMAT).to_string()
}
