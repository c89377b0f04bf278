//! Configuration types for the upload sorter

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Category subfolder placed under the month folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Camera RAW files (nef, ...)
    Raw,
    /// Video files (mp4, mov, ...)
    Video,
}

impl Category {
    /// Get the folder name for this category
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::Raw => "RAW",
            Category::Video => "VIDEO",
        }
    }
}

/// The three switches that control one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingPolicy {
    /// Rename files to `YYYY-MM-DD HH.MM.SS.ext`
    pub rename: bool,
    /// Descend into subdirectories and remove them once drained
    pub recursive: bool,
    /// Delete files whose content was already seen in this run
    pub deduplicate: bool,
}

impl Default for ProcessingPolicy {
    fn default() -> Self {
        Self {
            rename: true,
            recursive: true,
            deduplicate: false,
        }
    }
}

/// Configuration for the upload sorter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory to organise. When unset, the Dropbox `Camera Uploads`
    /// directory is used.
    pub root_dir: Option<PathBuf>,

    /// Rename files to the canonical timestamp name
    pub rename: bool,

    /// Sort subdirectories too
    pub recursive: bool,

    /// Remove exact duplicates (SHA-512)
    pub deduplicate: bool,

    /// Verbose output
    pub verbose: bool,

    /// Extensions routed to the RAW subfolder
    pub raw_extensions: Vec<String>,

    /// Extensions routed to the VIDEO subfolder
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let policy = ProcessingPolicy::default();
        Self {
            root_dir: None,
            rename: policy.rename,
            recursive: policy.recursive,
            deduplicate: policy.deduplicate,
            verbose: false,
            raw_extensions: vec!["nef".into()],
            video_extensions: vec!["mov".into(), "avi".into(), "mp4".into(), "mpg".into()],
        }
    }
}

impl Config {
    /// Policy switches for a run
    pub fn policy(&self) -> ProcessingPolicy {
        ProcessingPolicy {
            rename: self.rename,
            recursive: self.recursive,
            deduplicate: self.deduplicate,
        }
    }

    /// Check if a file extension is a RAW format
    pub fn is_raw(&self, ext: &str) -> bool {
        let ext_lower = normalize_ext(ext);
        self.raw_extensions.iter().any(|e| normalize_ext(e) == ext_lower)
    }

    /// Check if a file extension is a video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = normalize_ext(ext);
        self.video_extensions.iter().any(|e| normalize_ext(e) == ext_lower)
    }

    /// Get the category subfolder for a given extension, RAW first
    pub fn category_for(&self, ext: &str) -> Option<Category> {
        if self.is_raw(ext) {
            Some(Category::Raw)
        } else if self.is_video(ext) {
            Some(Category::Video)
        } else {
            None
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Upload Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Directory to organise. Leave out to use the Dropbox "Camera Uploads" folder.
root_dir = "/home/me/Dropbox/Camera Uploads"

# Rename files to "YYYY-MM-DD HH.MM.SS.ext" (true) or keep their names (false).
# Name clashes always get a "_1", "_2", ... suffix.
rename = true

# Sort subdirectories as well and remove them once they are empty
recursive = true

# Delete files whose content (SHA-512) was already seen in this run
deduplicate = false

# Verbose output
verbose = false

# Extensions that go to YYYY-MM/RAW and YYYY-MM/VIDEO (case-insensitive)
raw_extensions = ["nef"]
video_extensions = ["mov", "avi", "mp4", "mpg"]
"#
        .to_string()
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_policy() {
        let policy = Config::default().policy();
        assert!(policy.rename);
        assert!(policy.recursive);
        assert!(!policy.deduplicate);
    }

    #[test]
    fn test_category_for() {
        let config = Config::default();
        assert_eq!(config.category_for("NEF"), Some(Category::Raw));
        assert_eq!(config.category_for(".nef"), Some(Category::Raw));
        assert_eq!(config.category_for("mp4"), Some(Category::Video));
        assert_eq!(config.category_for("MOV"), Some(Category::Video));
        assert_eq!(config.category_for("jpg"), None);
        assert_eq!(config.category_for(""), None);
    }

    #[test]
    fn test_raw_takes_precedence() {
        let config = Config {
            raw_extensions: vec!["dng".into()],
            video_extensions: vec!["dng".into()],
            ..Config::default()
        };
        assert_eq!(config.category_for("dng"), Some(Category::Raw));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"deduplicate = true\nvideo_extensions = [\"mkv\"]\n")
            .unwrap();
        file.flush().unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert!(config.deduplicate);
        assert!(config.rename);
        assert!(config.root_dir.is_none());
        assert!(config.is_video("MKV"));
        assert!(!config.is_video("mp4"));
        assert!(config.is_raw("nef"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.policy(), ProcessingPolicy::default());
        assert_eq!(config.raw_extensions, vec!["nef".to_string()]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::load_from_file("/nonexistent/upload-sorter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
