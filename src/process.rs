//! Directory walker and per-file pipeline
//!
//! Handles the core logic of:
//! - Walking the source tree bottom-up with an explicit stack
//! - Removing duplicate files by content hash
//! - Detecting timestamps
//! - Moving files into `root/YYYY-MM/` and removing drained directories

use crate::config::{Config, ProcessingPolicy};
use crate::destination::{move_file, resolve_destination};
use crate::error::{Error, Result};
use crate::hash::DuplicateFilter;
use crate::time::{ExtractedTime, extract_time};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination file path (if moved or already in place)
    pub destination: Option<PathBuf>,
    /// Detected time information
    pub time_info: Option<ExtractedTime>,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if skipped)
    pub error: Option<String>,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// File was moved to its destination
    Moved,
    /// File already sat at its destination
    Unchanged,
    /// File was deleted as a duplicate
    Duplicate,
    /// Date could not be detected, file left in place
    Skipped,
}

/// Processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub moved: usize,
    pub unchanged: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub removed_dirs: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, status: ProcessingStatus) {
        self.total_files += 1;
        match status {
            ProcessingStatus::Moved => self.moved += 1,
            ProcessingStatus::Unchanged => self.unchanged += 1,
            ProcessingStatus::Duplicate => self.duplicates += 1,
            ProcessingStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Moved: {}, Unchanged: {}, Duplicates: {}, Skipped: {}, Removed dirs: {}",
            self.total_files,
            self.moved,
            self.unchanged,
            self.duplicates,
            self.skipped,
            self.removed_dirs
        )
    }
}

/// One directory on the walk stack with the entries still to visit
struct Frame {
    dir: PathBuf,
    entries: vec::IntoIter<PathBuf>,
}

/// Main processor for organizing an upload directory
pub struct Processor {
    config: Config,
    root: PathBuf,
    policy: ProcessingPolicy,
    duplicates: DuplicateFilter,
    /// Destinations produced in this run, never visited again
    placed: HashSet<PathBuf>,
    stats: ProcessingStats,
}

impl Processor {
    /// Create a new processor for `root` with the given configuration
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let policy = config.policy();
        Self {
            config,
            root: root.into(),
            policy,
            duplicates: DuplicateFilter::new(),
            placed: HashSet::new(),
            stats: ProcessingStats::new(),
        }
    }

    /// Run the processing pipeline over the whole tree
    ///
    /// Stops at the first fatal error; files already moved stay moved.
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "processor_run", root = %self.root.display()).entered();

        let mut results = Vec::new();
        let mut stack = vec![self.open_frame(self.root.clone())?];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                let done = stack.pop().map(|frame| frame.dir);
                if let Some(dir) = done
                    && dir != self.root
                {
                    self.remove_drained_dir(&dir);
                }
                continue;
            };

            if entry.is_dir() {
                if self.policy.recursive {
                    info!("Process dir {}", entry.display());
                    stack.push(self.open_frame(entry)?);
                } else {
                    info!("Skip dir {}", entry.display());
                }
            } else if self.placed.contains(&entry) {
                debug!(?entry, "Already placed in this run");
            } else {
                info!("Process file {}", entry.display());
                let result = self.process_file(&entry)?;
                self.stats.record(result.status);
                results.push(result);
            }
        }

        info!(summary = %self.stats.summary(), "Processing complete");
        Ok(results)
    }

    /// Get processing statistics
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Snapshot the entries of `dir`, sorted by file name
    fn open_frame(&self, dir: PathBuf) -> Result<Frame> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::ListDirectory {
                path: dir.clone(),
                source: e.into(),
            })?;
            entries.push(entry.into_path());
        }

        Ok(Frame {
            dir,
            entries: entries.into_iter(),
        })
    }

    /// Remove a subdirectory once its files have been moved out
    fn remove_drained_dir(&mut self, dir: &Path) {
        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!(?dir, "Removed empty directory");
                self.stats.removed_dirs += 1;
            }
            Err(e) => debug!(?dir, error = %e, "Directory kept"),
        }
    }

    /// Duplicate check, date detection and move for one file
    fn process_file(&mut self, path: &Path) -> Result<FileResult> {
        let _file_span = span!(Level::DEBUG, "process_file", ?path).entered();

        if self.policy.deduplicate && self.duplicates.is_duplicate(path)? {
            return Ok(FileResult {
                source: path.to_path_buf(),
                destination: None,
                time_info: None,
                status: ProcessingStatus::Duplicate,
                error: None,
            });
        }

        let time_info = match extract_time(path) {
            Ok(time_info) => time_info,
            Err(e) if e.is_recoverable() => {
                warn!(?path, error = %e, "Skipping file");
                return Ok(FileResult {
                    source: path.to_path_buf(),
                    destination: None,
                    time_info: None,
                    status: ProcessingStatus::Skipped,
                    error: Some(e.to_string()),
                });
            }
            Err(e) => return Err(e),
        };

        let dest = resolve_destination(
            path,
            &self.root,
            &time_info.timestamp,
            self.policy.rename,
            &self.config,
        )?;

        let status = if move_file(path, &dest)? {
            ProcessingStatus::Moved
        } else {
            ProcessingStatus::Unchanged
        };
        self.placed.insert(dest.clone());

        Ok(FileResult {
            source: path.to_path_buf(),
            destination: Some(dest),
            time_info: Some(time_info),
            status,
            error: None,
        })
    }
}
