//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Upload Sorter - sorts camera uploads into year-month folders
///
/// Files are moved into `<path>/YYYY-MM/` (RAW and VIDEO files into
/// subfolders), optionally renamed to `YYYY-MM-DD HH.MM.SS.ext`, with exact
/// duplicates removed on request.
#[derive(Parser, Debug)]
#[command(name = "upload-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directory to organise (defaults to the Dropbox "Camera Uploads" folder)
    #[arg(short, long, env = "UPLOAD_SORTER_PATH")]
    pub path: Option<PathBuf>,

    /// Keep original file names instead of renaming to the timestamp
    #[arg(long)]
    pub no_rename: bool,

    /// Only sort the top-level directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Remove files whose content (SHA-512) was already seen
    #[arg(short, long)]
    pub deduplicate: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON lines
    #[arg(long, requires = "log_file")]
    pub json_log: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref path) = self.path {
            config.root_dir = Some(path.clone());
        }
        if self.no_rename {
            config.rename = false;
        }
        if self.no_recursive {
            config.recursive = false;
        }
        if self.deduplicate {
            config.deduplicate = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
