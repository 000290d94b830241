use crate::{ConfigError, ConfigErrorResult, DatabaseConfig, LoggingConfig, NotifierConfig};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

const CONFIG_DIR_ENV: &str = "CN_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".cn";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub notifier: NotifierConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for CN_CONFIG_DIR env var, else use ./.cn/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply CN_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CN_CONFIG_DIR env var > ./.cn/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.database.validate()?;
        self.notifier.validate()?;
        Ok(())
    }

    /// Get absolute path to the contact store database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get absolute path to the log file, if logging to a file.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => Ok(Some(Self::config_dir()?.join(file))),
            None => Ok(None),
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  database: {}", self.database.path);
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  notifier: lookups={} concurrent, timeout={}s",
            self.notifier.max_concurrent_lookups, self.notifier.lookup_timeout_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Logging
        Self::apply_env_parse("CN_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CN_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("CN_LOG_FILE", &mut self.logging.file);

        // Database
        Self::apply_env_string("CN_DATABASE_PATH", &mut self.database.path);

        // Notifier
        Self::apply_env_parse(
            "CN_NOTIFIER_MAX_CONCURRENT_LOOKUPS",
            &mut self.notifier.max_concurrent_lookups,
        );
        Self::apply_env_parse(
            "CN_NOTIFIER_LOOKUP_TIMEOUT_SECS",
            &mut self.notifier.lookup_timeout_secs,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
