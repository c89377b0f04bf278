//! Time detection module
//!
//! A file's timestamp comes from:
//! - its canonical file name (`YYYY-MM-DD HH.MM.SS.ext`), so already sorted
//!   files keep their date on re-runs
//! - otherwise the file system modification time

pub mod filename;

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Source of the detected timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Parsed from the canonical filename
    Filename,
    /// From file system modification time
    FileSystem,
}

/// Result of timestamp detection
#[derive(Debug, Clone)]
pub struct ExtractedTime {
    /// The detected timestamp, in local time
    pub timestamp: NaiveDateTime,
    /// Source of the timestamp
    pub source: TimeSource,
}

/// Detect the timestamp of a media file
///
/// The detection follows this priority:
/// 1. Canonical filename
/// 2. File system modification time (local time zone)
///
/// Fails with [`Error::DateDetection`] only when the metadata can't be read.
pub fn extract_time(path: &Path) -> Result<ExtractedTime> {
    if let Some(time) = filename::parse_filename_time(path) {
        debug!(?path, "Detected time from filename");
        return Ok(ExtractedTime {
            timestamp: time,
            source: TimeSource::Filename,
        });
    }

    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|e| Error::DateDetection {
            path: path.to_path_buf(),
            source: e,
        })?;
    let datetime: DateTime<Local> = modified.into();

    debug!(?path, "Using file system modification time");

    Ok(ExtractedTime {
        timestamp: datetime.naive_local(),
        source: TimeSource::FileSystem,
    })
}
