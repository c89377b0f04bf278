//! Destination path computation and file moves
//!
//! Files land in `root/YYYY-MM/`, or `root/YYYY-MM/RAW/` and
//! `root/YYYY-MM/VIDEO/` for the configured category extensions.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::time::filename::{canonical_stem, month_folder, split_name};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound for `_n` suffixes tried when resolving a name clash
const MAX_CONFLICT_SUFFIX: u32 = 10_000;

/// Build the destination for `source` before collision resolution
pub fn build_base_destination_path(
    source: &Path,
    root: &Path,
    timestamp: &NaiveDateTime,
    rename: bool,
    config: &Config,
) -> Result<PathBuf> {
    let filename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NameConflict {
            path: source.to_path_buf(),
        })?;
    let (_, ext) = split_name(&filename);

    let mut dest = root.join(month_folder(timestamp));
    if let Some(category) = config.category_for(ext) {
        dest.push(category.folder_name());
    }

    if rename {
        dest.push(format!("{}{}", canonical_stem(timestamp), ext));
    } else {
        dest.push(&filename);
    }

    Ok(dest)
}

/// Resolve filename conflicts by adding a numeric suffix
///
/// A destination equal to `source` is returned untouched. Otherwise the
/// first of `dest`, `stem_1.ext`, `stem_2.ext`, ... that is either free or is
/// `source` itself wins.
pub fn resolve_filename_conflict(source: &Path, dest: PathBuf) -> Result<PathBuf> {
    if dest == source || !dest.exists() {
        return Ok(dest);
    }

    let filename = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NameConflict { path: dest.clone() })?;
    let (stem, extension) = split_name(&filename);

    let parent = dest.parent().map(|p| p.to_path_buf()).unwrap_or_default();

    for i in 1..MAX_CONFLICT_SUFFIX {
        let candidate = parent.join(format!("{}_{}{}", stem, i, extension));
        if candidate == source || !candidate.exists() {
            debug!(?candidate, "Resolved filename conflict");
            return Ok(candidate);
        }
    }

    Err(Error::NameConflict { path: dest })
}

/// Compute the final destination for `source`
pub fn resolve_destination(
    source: &Path,
    root: &Path,
    timestamp: &NaiveDateTime,
    rename: bool,
    config: &Config,
) -> Result<PathBuf> {
    let dest = build_base_destination_path(source, root, timestamp, rename, config)?;
    resolve_filename_conflict(source, dest)
}

/// Move `source` to `dest`, creating the destination folder first
///
/// Returns `false` when the file already sits at its destination.
pub fn move_file(source: &Path, dest: &Path) -> Result<bool> {
    if source == dest {
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::rename(source, dest).map_err(|e| Error::MoveFile {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })?;
    info!("Move {} -> {}", source.display(), dest.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_category_routing() {
        let config = Config::default();
        let root = Path::new("/root");
        let base = |name: &str| {
            build_base_destination_path(&root.join(name), root, &ts(), false, &config).unwrap()
        };

        assert_eq!(base("in/IMG_001.NEF"), root.join("2021-03/RAW/IMG_001.NEF"));
        assert_eq!(base("clip.mp4"), root.join("2021-03/VIDEO/clip.mp4"));
        assert_eq!(base("photo.jpg"), root.join("2021-03/photo.jpg"));
    }

    #[test]
    fn test_rename_keeps_extension_case() {
        let config = Config::default();
        let root = Path::new("/root");
        let renamed = |name: &str| {
            build_base_destination_path(&root.join(name), root, &ts(), true, &config).unwrap()
        };

        assert_eq!(renamed("DSC_0001.JPG"), root.join("2021-03/2021-03-05 14.30.00.JPG"));
        assert_eq!(renamed("noext"), root.join("2021-03/2021-03-05 14.30.00"));
    }

    #[test]
    fn test_dotfile_name_is_its_extension() {
        let config = Config::default();
        let root = Path::new("/root");
        let source = root.join(".DS_Store");

        let dest = build_base_destination_path(&source, root, &ts(), true, &config).unwrap();
        assert_eq!(dest, root.join("2021-03/2021-03-05 14.30.00.DS_Store"));
    }

    #[test]
    fn test_extensionless_canonical_name_is_stable() {
        let config = Config::default();
        let root = Path::new("/root");
        let source = root.join("2021-03/2021-03-05 14.30.00");

        let dest = build_base_destination_path(&source, root, &ts(), true, &config).unwrap();
        assert_eq!(dest, source);
    }

    #[test]
    fn test_conflict_without_extension() {
        let dir = TempDir::new().unwrap();
        let taken = dir.path().join("2021-03-05 14.30.00");
        fs::write(&taken, b"a").unwrap();

        let source = dir.path().join("other");
        let dest = resolve_filename_conflict(&source, taken).unwrap();
        assert_eq!(dest, dir.path().join("2021-03-05 14.30.00_1"));
    }

    #[test]
    fn test_conflict_gets_suffix() {
        let dir = TempDir::new().unwrap();
        let month = dir.path().join("2021-03");
        fs::create_dir_all(&month).unwrap();
        fs::write(month.join("2021-03-05 14.30.00.jpg"), b"a").unwrap();

        let source = dir.path().join("other.jpg");
        let taken = month.join("2021-03-05 14.30.00.jpg");
        let dest = resolve_filename_conflict(&source, taken.clone()).unwrap();
        assert_eq!(dest, month.join("2021-03-05 14.30.00_1.jpg"));

        fs::write(month.join("2021-03-05 14.30.00_1.jpg"), b"b").unwrap();
        let dest = resolve_filename_conflict(&source, taken).unwrap();
        assert_eq!(dest, month.join("2021-03-05 14.30.00_2.jpg"));
    }

    #[test]
    fn test_source_is_not_a_conflict() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("2021-03-05 14.30.00.jpg");
        let suffixed = dir.path().join("2021-03-05 14.30.00_1.jpg");
        fs::write(&base, b"a").unwrap();
        fs::write(&suffixed, b"b").unwrap();

        assert_eq!(resolve_filename_conflict(&base, base.clone()).unwrap(), base);
        assert_eq!(resolve_filename_conflict(&suffixed, base).unwrap(), suffixed);
    }

    #[test]
    fn test_move_creates_folder() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        fs::write(&source, b"jpeg").unwrap();
        let dest = dir.path().join("2021-03/RAW/photo.jpg");

        assert!(move_file(&source, &dest).unwrap());
        assert!(!source.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"jpeg");

        assert!(!move_file(&dest, &dest).unwrap());
        assert!(dest.exists());
    }

    #[test]
    fn test_move_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("gone.jpg");
        let err = move_file(&source, &dir.path().join("2021-03/gone.jpg")).unwrap_err();
        assert!(matches!(err, Error::MoveFile { .. }));
    }
}
