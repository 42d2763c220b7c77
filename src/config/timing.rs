use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_INIT_LIMIT;
use crate::constants::DEFAULT_SYNC_LIMIT;
use crate::constants::DEFAULT_TICK_TIME_MS;
use crate::Error;
use crate::Result;

/// Timing parameters every node of the ensemble runs with
///
/// The defaults keep test runs fast rather than production-safe.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// Base heartbeat interval in milliseconds
    ///
    /// Default: `default_tick_time_ms()` (2000)
    #[serde(default = "default_tick_time_ms")]
    pub tick_time_ms: u64,

    /// Ticks a follower may fall behind the leader before it is dropped
    ///
    /// Default: `default_sync_limit()` (5)
    #[serde(default = "default_sync_limit")]
    pub sync_limit: u32,

    /// Ticks a follower may take to connect and sync with the leader on startup
    ///
    /// Default: `default_init_limit()` (10)
    #[serde(default = "default_init_limit")]
    pub init_limit: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_time_ms: default_tick_time_ms(),
            sync_limit: default_sync_limit(),
            init_limit: default_init_limit(),
        }
    }
}

impl TimingConfig {
    pub fn tick_time(&self) -> Duration {
        Duration::from_millis(self.tick_time_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_time_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "tick_time_ms must be greater than 0".into(),
            )));
        }

        if self.sync_limit == 0 || self.init_limit == 0 {
            return Err(Error::Config(ConfigError::Message(
                "sync_limit and init_limit must be greater than 0".into(),
            )));
        }

        if self.init_limit < self.sync_limit {
            return Err(Error::Config(ConfigError::Message(format!(
                "init_limit({}) must not be smaller than sync_limit({})",
                self.init_limit, self.sync_limit
            ))));
        }

        Ok(())
    }
}

fn default_tick_time_ms() -> u64 {
    DEFAULT_TICK_TIME_MS
}
fn default_sync_limit() -> u32 {
    DEFAULT_SYNC_LIMIT
}
fn default_init_limit() -> u32 {
    DEFAULT_INIT_LIMIT
}
