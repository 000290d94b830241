mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod notifier_config;

pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use notifier_config::{
    DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_LOOKUPS, MAX_LOOKUP_TIMEOUT_SECS,
    MAX_MAX_CONCURRENT_LOOKUPS, MIN_LOOKUP_TIMEOUT_SECS, MIN_MAX_CONCURRENT_LOOKUPS,
    NotifierConfig,
};

const DEFAULT_DATABASE_FILENAME: &str = "contacts.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;

#[cfg(test)]
mod tests;
