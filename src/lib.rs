//! Upload Sorter - sorts camera uploads into a date-based folder tree
//!
//! This library provides functionality for organizing photos and videos
//! with support for:
//! - Timestamp detection from canonical file names and modification time
//! - `YYYY-MM/` folders with `RAW` and `VIDEO` category subfolders
//! - Renaming to `YYYY-MM-DD HH.MM.SS.ext` with `_n` collision suffixes
//! - SHA-512 based duplicate removal
//! - Dropbox `Camera Uploads` lookup as a default source

pub mod cli;
pub mod config;
pub mod destination;
pub mod dropbox;
pub mod error;
pub mod hash;
pub mod process;
pub mod time;

pub use cli::Cli;
pub use config::{Category, Config, ConfigError, ProcessingPolicy};
pub use error::{Error, Result};
pub use process::{FileResult, ProcessingStats, ProcessingStatus, Processor};
