//! Settings for the diary binary.
//!
//! Each value remembers where it came from so `glucon config show` can
//! report it. `GLUCON_DATABASE_PATH` wins over the YAML file, which wins
//! over the built-in location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::DATABASE_FILE;

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "GLUCON_DATABASE_PATH";

const APP_DIR: &str = "glucon";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
        };
        f.write_str(name)
    }
}

/// A setting together with the layer that supplied it
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Where the diary database lives
    pub database_path: ConfigValue<PathBuf>,
    /// YAML file that was read, if one existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Keys accepted in the YAML file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileSettings {
    database_path: Option<PathBuf>,
}

impl FileSettings {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }
}

impl Config {
    /// Build the configuration from defaults, the YAML file at `config_path`
    /// (or the platform default) and the environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self {
            database_path: ConfigValue::new(
                Self::default_data_dir().join(DATABASE_FILE),
                ConfigSource::Default,
            ),
            config_file: None,
        };

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let settings = FileSettings::read(&path)?;
            if let Some(db_path) = settings.database_path {
                config.database_path =
                    ConfigValue::new(relative_to(&path, db_path), ConfigSource::File);
            }
            config.config_file = Some(path);
        }

        if let Ok(db_path) = std::env::var(DATABASE_PATH_ENV) {
            config.database_path =
                ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }

        Ok(config)
    }

    /// `glucon` under the platform config dir (`~/.config` on Linux)
    pub fn default_config_dir() -> PathBuf {
        app_dir(dirs::config_dir())
    }

    /// `glucon` under the platform data dir (`~/.local/share` on Linux)
    pub fn default_data_dir() -> PathBuf {
        app_dir(dirs::data_dir())
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Paths in the config file are relative to the file itself
fn relative_to(config_file: &Path, path: PathBuf) -> PathBuf {
    match config_file.parent() {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    ReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, #[source] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config
            .database_path
            .value
            .to_string_lossy()
            .contains("diary.db"));
        assert_eq!(config.database_path.source, ConfigSource::Default);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /custom/path/diary.sqlite").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(
            config.database_path.value,
            PathBuf::from("/custom/path/diary.sqlite")
        );
        assert_eq!(config.database_path.source, ConfigSource::File);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_path_resolved_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: data/diary.db").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.database_path.value,
            temp_dir.path().join("data").join("diary.db")
        );
    }

    #[test]
    fn test_relative_to() {
        let file = Path::new("/etc/glucon/config.yaml");
        assert_eq!(
            relative_to(file, PathBuf::from("diary.db")),
            PathBuf::from("/etc/glucon/diary.db")
        );
        assert_eq!(
            relative_to(file, PathBuf::from("/var/lib/diary.db")),
            PathBuf::from("/var/lib/diary.db")
        );
    }

    #[test]
    fn test_app_dir_falls_back_to_cwd() {
        assert_eq!(app_dir(None), PathBuf::from(".").join("glucon"));
        assert_eq!(
            app_dir(Some(PathBuf::from("/data"))),
            PathBuf::from("/data/glucon")
        );
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ConfigSource::Default.to_string(), "default");
        assert_eq!(ConfigSource::Environment.to_string(), "environment");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::File::create(&config_path).unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.database_path.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /from/file.db").unwrap();

        std::env::set_var(DATABASE_PATH_ENV, "/from/env.db");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.database_path.value, PathBuf::from("/from/env.db"));
        assert_eq!(config.database_path.source, ConfigSource::Environment);

        std::env::remove_var(DATABASE_PATH_ENV);
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
