//! SHA-512 content hashing for deduplication
//!
//! Files are streamed through the hasher in fixed-size chunks, so memory use
//! does not depend on file size.

use crate::error::{Error, Result};
use sha2::{Digest, Sha512};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{info, trace};

/// Read buffer size for hashing (64KB)
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the hex-encoded SHA-512 digest of a file's full content
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let hash_err = |e| Error::HashComputation {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(hash_err)?;
    let mut hasher = Sha512::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(hash_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hex::encode(hasher.finalize());
    trace!(?path, %hash, "Computed file hash");
    Ok(hash)
}

/// Remembers content hashes seen during one run
///
/// The first file with a given content is kept; later ones are deleted.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    seen: HashSet<String>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `path` and delete it if its content was seen before
    ///
    /// Returns `true` when the file was a duplicate and has been removed.
    /// The file is closed before deletion.
    pub fn is_duplicate(&mut self, path: &Path) -> Result<bool> {
        let hash = compute_file_hash(path)?;

        if self.seen.contains(&hash) {
            fs::remove_file(path).map_err(|e| Error::RemoveDuplicate {
                path: path.to_path_buf(),
                source: e,
            })?;
            info!(?path, "Removed duplicate file");
            return Ok(true);
        }

        self.seen.insert(hash);
        Ok(false)
    }

    /// Number of distinct contents seen so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
