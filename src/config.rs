use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use liftlog_core::plan::{DEFAULT_BAR_WEIGHT, DEFAULT_PLATES};
use liftlog_core::Plates;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
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

/// Where tables are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per table under the data directory
    #[default]
    File,
    /// A single SQLite database under the data directory
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(format!(
                "Invalid backend '{}'. Valid options: file, sqlite",
                s
            )),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the stored tables
    pub data_dir: ConfigValue<PathBuf>,
    /// Storage backend
    pub backend: ConfigValue<Backend>,
    /// Weight of the empty bar
    pub bar_weight: ConfigValue<f64>,
    /// Plate weights available per side
    pub plates: ConfigValue<Vec<f64>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    backend: Option<Backend>,
    bar_weight: Option<f64>,
    plates: Option<Vec<f64>>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading environment overrides through `env`.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut backend = ConfigValue::new(Backend::default(), ConfigSource::Default);
        let mut bar_weight = ConfigValue::new(DEFAULT_BAR_WEIGHT, ConfigSource::Default);
        let mut plates = ConfigValue::new(DEFAULT_PLATES.to_vec(), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(value) = file_config.backend {
                backend = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(value) = file_config.bar_weight {
                bar_weight = ConfigValue::new(value, ConfigSource::File);
            }
            if let Some(value) = file_config.plates {
                plates = ConfigValue::new(value, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Some(dir) = env("LIFTLOG_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(value) = env("LIFTLOG_BACKEND") {
            let value = value.parse().map_err(ConfigError::Invalid)?;
            backend = ConfigValue::new(value, ConfigSource::Environment);
        }
        if let Some(value) = env("LIFTLOG_BAR_WEIGHT") {
            let value = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("LIFTLOG_BAR_WEIGHT is not a number: '{}'", value))
            })?;
            bar_weight = ConfigValue::new(value, ConfigSource::Environment);
        }

        let config = Self {
            data_dir,
            backend,
            bar_weight,
            plates,
            config_file,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bar = self.bar_weight.value;
        if !bar.is_finite() || bar <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bar_weight must be a positive number, got {}",
                bar
            )));
        }
        if let Some(bad) = self
            .plates
            .value
            .iter()
            .find(|p| !p.is_finite() || **p <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "plates must be positive numbers, got {}",
                bad
            )));
        }
        if self.plates.value.is_empty() {
            return Err(ConfigError::Invalid("plates cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Configured plates, largest first
    pub fn plates(&self) -> Plates {
        Plates::new(self.plates.value.iter().copied())
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/liftlog/
    /// - macOS: ~/Library/Application Support/liftlog/
    /// - Windows: %APPDATA%/liftlog/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftlog")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/liftlog/
    /// - macOS: ~/Library/Application Support/liftlog/
    /// - Windows: %APPDATA%/liftlog/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftlog")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

// Relative paths in a config file are relative to the file's directory
fn resolve_relative(config_path: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_relative() {
        config_path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
    } else {
        dir
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::Invalid(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &Path, lines: &[&str]) -> PathBuf {
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        config_path
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert!(config.data_dir.value.ends_with("liftlog"));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.backend.value, Backend::File);
        assert_eq!(config.bar_weight.value, 45.0);
        assert_eq!(config.plates.value, vec![45.0, 25.0, 10.0, 5.0, 2.5]);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            &[
                "data_dir: /custom/liftlog",
                "backend: sqlite",
                "bar_weight: 20",
                "plates: [20, 10, 5, 1.25]",
            ],
        );

        let config = Config::load_with_env(Some(config_path.clone()), no_env).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/custom/liftlog"));
        assert_eq!(config.backend.value, Backend::Sqlite);
        assert_eq!(config.backend.source, ConfigSource::File);
        assert_eq!(config.bar_weight.value, 20.0);
        assert_eq!(config.plates().as_slice(), &[20.0, 10.0, 5.0, 1.25]);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), &["data_dir: data"]);

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), &["bar_weight: 35", "backend: file"]);

        let env: HashMap<&str, &str> = [
            ("LIFTLOG_BAR_WEIGHT", "15"),
            ("LIFTLOG_BACKEND", "sqlite"),
            ("LIFTLOG_DATA_DIR", "/from/env"),
        ]
        .into_iter()
        .collect();

        let config = Config::load_with_env(Some(config_path), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config.bar_weight.value, 15.0);
        assert_eq!(config.bar_weight.source, ConfigSource::Environment);
        assert_eq!(config.backend.value, Backend::Sqlite);
        assert_eq!(config.data_dir.value, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_invalid_env_value() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let result = Config::load_with_env(Some(config_path), |key| {
            (key == "LIFTLOG_BACKEND").then(|| "postgres".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = tempdir().unwrap();

        let config_path = write_config(temp_dir.path(), &["bar_weight: 0"]);
        let err = Config::load_with_env(Some(config_path), no_env).unwrap_err();
        assert!(err.to_string().contains("bar_weight"));

        let config_path = write_config(temp_dir.path(), &["plates: [45, -5]"]);
        let err = Config::load_with_env(Some(config_path), no_env).unwrap_err();
        assert!(err.to_string().contains("plates"));

        let config_path = write_config(temp_dir.path(), &["plates: []"]);
        assert!(Config::load_with_env(Some(config_path), no_env).is_err());
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), &["invalid: yaml: content: ["]);

        let result = Config::load_with_env(Some(config_path), no_env);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!(Backend::from_str("file").unwrap(), Backend::File);
        assert_eq!(Backend::from_str("SQLite").unwrap(), Backend::Sqlite);
        assert!(Backend::from_str("redis").is_err());
    }
}
