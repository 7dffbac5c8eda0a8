//! Collector configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default cache lifetime - 50 ms
const DEFAULT_CACHE_LIFETIME_MS: u64 = 50;

/// Settings for a [`StatsCollector`](crate::collector::StatsCollector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// How long a delivered report is served from cache. Zero still serves a
    /// cached report to requests arriving within the same microsecond.
    pub cache_lifetime: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            cache_lifetime: Duration::from_millis(DEFAULT_CACHE_LIFETIME_MS),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCollectorConfig {
    #[serde(default = "default_cache_lifetime_ms")]
    cache_lifetime_ms: u64,
}

fn default_cache_lifetime_ms() -> u64 {
    DEFAULT_CACHE_LIFETIME_MS
}

impl CollectorConfig {
    pub fn with_cache_lifetime(cache_lifetime: Duration) -> Self {
        Self { cache_lifetime }
    }

    /// Parse `{"cache_lifetime_ms": <u64>}`. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawCollectorConfig = serde_json::from_str(json)?;
        let cache_lifetime = Duration::from_millis(raw.cache_lifetime_ms);
        if i64::try_from(cache_lifetime.as_micros()).is_err() {
            return Err(ConfigError::LifetimeOutOfRange {
                ms: raw.cache_lifetime_ms,
            });
        }
        Ok(Self { cache_lifetime })
    }

    /// Cache lifetime in microseconds, saturating at `i64::MAX`.
    pub fn cache_lifetime_us(&self) -> i64 {
        i64::try_from(self.cache_lifetime.as_micros()).unwrap_or(i64::MAX)
    }
}
