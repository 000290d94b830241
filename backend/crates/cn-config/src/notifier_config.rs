use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Concurrent contact lookups per dispatch
pub const MIN_MAX_CONCURRENT_LOOKUPS: usize = 1;
pub const MAX_MAX_CONCURRENT_LOOKUPS: usize = 1024;
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 16;

// Per-subscriber contact lookup timeout (seconds)
pub const MIN_LOOKUP_TIMEOUT_SECS: u64 = 1;
pub const MAX_LOOKUP_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Dispatch tuning for contact-change notifications.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Contact store reads allowed in flight for a single dispatch
    pub max_concurrent_lookups: usize,
    /// A subscriber whose lookup exceeds this is skipped for that event
    pub lookup_timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
        }
    }
}

impl NotifierConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_concurrent_lookups < MIN_MAX_CONCURRENT_LOOKUPS
            || self.max_concurrent_lookups > MAX_MAX_CONCURRENT_LOOKUPS
        {
            return Err(ConfigError::notifier(format!(
                "notifier.max_concurrent_lookups must be {}-{}, got {}",
                MIN_MAX_CONCURRENT_LOOKUPS, MAX_MAX_CONCURRENT_LOOKUPS, self.max_concurrent_lookups
            )));
        }

        if self.lookup_timeout_secs < MIN_LOOKUP_TIMEOUT_SECS
            || self.lookup_timeout_secs > MAX_LOOKUP_TIMEOUT_SECS
        {
            return Err(ConfigError::notifier(format!(
                "notifier.lookup_timeout_secs must be {}-{}, got {}",
                MIN_LOOKUP_TIMEOUT_SECS, MAX_LOOKUP_TIMEOUT_SECS, self.lookup_timeout_secs
            )));
        }

        Ok(())
    }
}
