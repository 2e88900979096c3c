//! On-disk files: `config.toml` for settings and `state.toml` for the
//! signed-in user id.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};

const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "state.toml";

/// Errors reading or writing the config and session files.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no home directory to place mindline files in")]
    NoHomeDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode toml: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Contents of the session file. Only a signed-in, non-guest user id is
/// ever written.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// Owns the mindline directory and the two files in it.
pub struct StorageManager {
    dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory.
    ///
    /// # Errors
    /// Returns `ConfigError::NoHomeDir` when the platform has no such
    /// directory.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::in_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Uses `dir` instead of the platform directory.
    #[must_use]
    pub const fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding both files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads settings, writing a default file on first run. A file that
    /// does not parse is left untouched and defaults are used.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.dir.join(CONFIG_FILE_NAME), Path::to_path_buf);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "Writing default config");
                let config = AppConfig::default();
                write_atomic(&path, &toml::to_string_pretty(&config)?)?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config does not parse, using defaults");
            AppConfig::default()
        }))
    }

    /// Returns the remembered user id, if any. An unreadable session file
    /// is treated as signed out.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file exists but cannot be read.
    pub fn load_session(&self) -> Result<Option<String>, ConfigError> {
        let content = match fs::read_to_string(self.session_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file = toml::from_str::<SessionFile>(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Session file does not parse, treating as signed out");
            SessionFile::default()
        });
        Ok(file.user_id.filter(|id| !id.is_empty()))
    }

    /// Remembers `user_id` for the next start.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_session(&self, user_id: &str) -> Result<(), ConfigError> {
        let file = SessionFile {
            user_id: Some(user_id.to_string()),
        };
        write_atomic(&self.session_path(), &toml::to_string_pretty(&file)?)?;
        debug!("Session file written");
        Ok(())
    }

    /// Forgets the remembered user id. Missing file is not an error.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file exists and cannot be removed.
    pub fn clear_session(&self) -> Result<(), ConfigError> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }
}

/// Writes through a temp file in the same directory, then renames it
/// over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent directory"))?;
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::DEFAULT_API_URL;
    use tempfile::tempdir;

    fn manager() -> (tempfile::TempDir, StorageManager) {
        let dir = tempdir().unwrap();
        let manager = StorageManager::in_dir(dir.path().join("mindline"));
        (dir, manager)
    }

    #[test]
    fn test_first_run_writes_default_config() {
        let (_dir, manager) = manager();

        let config = manager.load_config(None).unwrap();

        assert!(config.persist_session);
        assert!(manager.dir().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_unparseable_config_kept_on_disk() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.dir()).unwrap();
        let path = manager.dir().join(CONFIG_FILE_NAME);
        fs::write(&path, "api_url = [").unwrap();

        let config = manager.load_config(None).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(fs::read_to_string(&path).unwrap(), "api_url = [");
    }

    #[test]
    fn test_no_session_before_login() {
        let (_dir, manager) = manager();

        assert_eq!(manager.load_session().unwrap(), None);
    }

    #[test]
    fn test_session_remembered_then_forgotten() {
        let (_dir, manager) = manager();

        manager.save_session("user-42").unwrap();
        assert_eq!(manager.load_session().unwrap().as_deref(), Some("user-42"));

        manager.clear_session().unwrap();
        assert_eq!(manager.load_session().unwrap(), None);
        manager.clear_session().unwrap();
    }

    #[test]
    fn test_corrupt_or_blank_session_means_signed_out() {
        let (_dir, manager) = manager();
        fs::create_dir_all(manager.dir()).unwrap();

        fs::write(manager.session_path(), "user_id = ").unwrap();
        assert_eq!(manager.load_session().unwrap(), None);

        fs::write(manager.session_path(), "user_id = \"\"").unwrap();
        assert_eq!(manager.load_session().unwrap(), None);
    }
}
