//! Upload Sorter - sorts camera uploads into a date-based folder tree
//!
//! Resolves the source directory (CLI, config file or Dropbox default),
//! runs the processor and prints a summary. Fatal errors exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use upload_sorter::{Cli, Config, ProcessingStatus, Processor, dropbox};

// CLI Output Module
mod cli_output {
    //! Colored summary output for the terminal

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let _ = stdout().execute(Print(format!("  {}\n", title.bold())));
    }

    /// Print one statistic line
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print one file result line
    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest_or_msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let source_styled = style(source).italic();
        let msg_styled = style(dest_or_msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(source_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Upload Sorter starting");

    let config = load_config(&cli)?;
    let root = resolve_root(&config)?;

    info!(
        root = %root.display(),
        rename = config.rename,
        recursive = config.recursive,
        deduplicate = config.deduplicate,
        "Sorting directory"
    );

    let mut processor = Processor::new(&root, config.clone());
    match processor.run() {
        Ok(results) => {
            print_summary(&processor, &results, config.verbose);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            Err(e.into())
        }
    }
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    Ok(config)
}

/// Pick the directory to sort: explicit path first, then the Dropbox default
fn resolve_root(config: &Config) -> Result<PathBuf> {
    let root = match config.root_dir {
        Some(ref path) => path.clone(),
        None => dropbox::find_camera_uploads_dir().context(
            "No directory given and the Dropbox camera uploads folder was not found; use --path",
        )?,
    };

    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    Ok(root)
}

/// Setup logging (console + optional file)
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    let Some(ref log_path) = cli.log_file else {
        subscriber.init();
        return Ok(None);
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;
    Ok(file)
}

fn print_summary(processor: &Processor, results: &[upload_sorter::FileResult], verbose: bool) {
    use cli_output::*;

    let stats = processor.stats();

    print_separator();
    print_title("Sorting complete");
    print_separator();
    print_stat("Moved", &stats.moved.to_string(), CliTheme::SUCCESS);
    print_stat("Unchanged", &stats.unchanged.to_string(), CliTheme::HINT);
    print_stat("Duplicates removed", &stats.duplicates.to_string(), CliTheme::ACCENT);
    print_stat("Skipped", &stats.skipped.to_string(), CliTheme::WARNING);
    print_stat("Directories removed", &stats.removed_dirs.to_string(), CliTheme::HINT);

    if stats.skipped > 0 {
        warn!(count = stats.skipped, "Some files were left in place");
    }

    if !verbose {
        return;
    }

    print_separator();
    for result in results {
        let source = result.source.display().to_string();
        let dest = result
            .destination
            .as_ref()
            .map(|p| format!("→ {}", p.display()))
            .unwrap_or_default();
        match result.status {
            ProcessingStatus::Moved => print_result("✓", CliTheme::SUCCESS, &source, &dest),
            ProcessingStatus::Unchanged => print_result("=", CliTheme::HINT, &source, "in place"),
            ProcessingStatus::Duplicate => print_result("≡", CliTheme::ACCENT, &source, "removed"),
            ProcessingStatus::Skipped => print_result(
                "⊘",
                CliTheme::WARNING,
                &source,
                result.error.as_deref().unwrap_or("skipped"),
            ),
        }
    }
}
