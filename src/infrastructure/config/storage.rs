//! Location and loading of `config.toml`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "oxipix";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Failure to locate or create the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No per-user config directory on this platform.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Reading or writing the file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The default configuration could not be serialized.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// The configuration file the process reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Uses `path_override` when given, the per-user config location otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` if no override is given and the
    /// platform has no config directory.
    pub fn locate(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path_override {
            return Ok(Self::at(path));
        }

        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(Self::at(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    /// Uses exactly `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration.
    ///
    /// A missing file is written with defaults; an unparsable one is left
    /// untouched and defaults are used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Config file not found, creating default");
            let config = AppConfig::default();
            self.write(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = %self.path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse config, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    fn write(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        let dir = containing_dir(&self.path);
        fs::create_dir_all(dir)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Directory holding `path`; `.` for a bare file name.
fn containing_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test]
    fn test_load_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let file = ConfigFile::at(&path);

        let config = file.load().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let written: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, AppConfig::default());
    }

    #[test]
    fn test_load_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "invalid_toml = [").unwrap();

        let config = ConfigFile::at(&path).load().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "invalid_toml = [");
    }

    #[test]
    fn test_load_reads_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[images]\nquality = 60\n\n[sizes]\nslot_percent = 75\n").unwrap();

        let config = ConfigFile::at(&path).load().unwrap();
        assert_eq!(config.images.quality, 60);
        assert_eq!(config.sizes.slot_percent, 75);
    }

    #[test]
    fn test_locate_uses_override_as_given() {
        let file = ConfigFile::locate(Some(Path::new("foo.toml"))).unwrap();
        assert_eq!(file.path(), Path::new("foo.toml"));
    }

    #[test_case("foo.toml", "." ; "bare_file_name")]
    #[test_case("conf/foo.toml", "conf" ; "relative_dir")]
    #[test_case("/etc/oxipix/config.toml", "/etc/oxipix" ; "absolute_dir")]
    fn test_containing_dir(path: &str, expected: &str) {
        assert_eq!(containing_dir(Path::new(path)), Path::new(expected));
    }
}
