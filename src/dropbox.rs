//! Default source directory lookup from the Dropbox desktop client
//!
//! The client writes its account roots to `info.json`; see
//! <https://help.dropbox.com/installs/locate-dropbox-folder>.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Folder the Dropbox client uploads camera pictures to
pub const CAMERA_UPLOADS_DIR_NAME: &str = "Camera Uploads";

/// Contents of the Dropbox `info.json` file
#[derive(Debug, Default, Deserialize)]
pub struct DropboxInfo {
    #[serde(default)]
    pub personal: Option<DropboxAccount>,
    #[serde(default)]
    pub business: Option<DropboxAccount>,
}

/// One linked Dropbox account
#[derive(Debug, Default, Deserialize)]
pub struct DropboxAccount {
    pub path: Option<PathBuf>,
    pub host: Option<i64>,
    pub is_team: Option<bool>,
    pub subscription_type: Option<String>,
}

impl DropboxInfo {
    /// Parse an `info.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Dropbox(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// First existing account root, personal before business
    pub fn root_path(&self) -> Option<&Path> {
        [&self.personal, &self.business]
            .into_iter()
            .flatten()
            .filter_map(|account| account.path.as_deref())
            .find(|path| path.exists())
    }
}

/// Possible locations of `info.json` for the current platform
pub fn settings_file_candidates() -> Vec<PathBuf> {
    if cfg!(windows) {
        ["APPDATA", "LOCALAPPDATA"]
            .iter()
            .filter_map(std::env::var_os)
            .map(|dir| PathBuf::from(dir).join("Dropbox").join("info.json"))
            .collect()
    } else {
        directories::BaseDirs::new()
            .map(|dirs| vec![dirs.home_dir().join(".dropbox").join("info.json")])
            .unwrap_or_default()
    }
}

/// Camera uploads directory under the account described by `info_path`
pub fn camera_uploads_from_info(info_path: &Path) -> Result<PathBuf> {
    let info = DropboxInfo::load(info_path)?;
    let root = info
        .root_path()
        .ok_or_else(|| Error::Dropbox("can't detect default dropbox directory path".into()))?;

    let uploads = root.join(CAMERA_UPLOADS_DIR_NAME);
    if uploads.is_dir() {
        Ok(uploads)
    } else {
        Err(Error::Dropbox(format!(
            "unable to detect camera upload path under {}",
            root.display()
        )))
    }
}

/// Locate the Dropbox camera uploads directory for the current user
pub fn find_camera_uploads_dir() -> Result<PathBuf> {
    let info_path = settings_file_candidates()
        .into_iter()
        .find(|path| path.exists())
        .ok_or_else(|| Error::Dropbox("Dropbox info.json not found".into()))?;

    debug!(info_file = %info_path.display(), "Found Dropbox settings");
    camera_uploads_from_info(&info_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_info(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("info.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_personal_account() {
        let dir = TempDir::new().unwrap();
        let dropbox = dir.path().join("Dropbox");
        fs::create_dir_all(dropbox.join(CAMERA_UPLOADS_DIR_NAME)).unwrap();

        let info = write_info(
            dir.path(),
            &serde_json::json!({
                "personal": {
                    "path": dropbox,
                    "host": 123456,
                    "is_team": false,
                    "subscription_type": "Basic"
                }
            })
            .to_string(),
        );

        let uploads = camera_uploads_from_info(&info).unwrap();
        assert_eq!(uploads, dropbox.join(CAMERA_UPLOADS_DIR_NAME));
    }

    #[test]
    fn test_business_fallback() {
        let dir = TempDir::new().unwrap();
        let business = dir.path().join("Dropbox (Team)");
        fs::create_dir_all(business.join(CAMERA_UPLOADS_DIR_NAME)).unwrap();

        let info = write_info(
            dir.path(),
            &serde_json::json!({
                "personal": { "path": dir.path().join("missing") },
                "business": { "path": business, "is_team": true }
            })
            .to_string(),
        );

        let uploads = camera_uploads_from_info(&info).unwrap();
        assert_eq!(uploads, business.join(CAMERA_UPLOADS_DIR_NAME));
    }

    #[test]
    fn test_missing_camera_uploads() {
        let dir = TempDir::new().unwrap();
        let info = write_info(
            dir.path(),
            &serde_json::json!({ "personal": { "path": dir.path() } }).to_string(),
        );

        assert!(matches!(
            camera_uploads_from_info(&info),
            Err(Error::Dropbox(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let info = write_info(dir.path(), "{ not json");
        assert!(matches!(
            camera_uploads_from_info(&info),
            Err(Error::Serialization(_))
        ));
    }
}
