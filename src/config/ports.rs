use std::ops::Range;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_PORT_MAX_ATTEMPTS;
use crate::constants::DEFAULT_PORT_RANGE_END;
use crate::constants::DEFAULT_PORT_RANGE_START;
use crate::Error;
use crate::Result;

/// Random port allocation parameters for generated instances
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PortConfig {
    /// First candidate port (inclusive)
    ///
    /// Default: `default_range_start()` (10000)
    #[serde(default = "default_range_start")]
    pub range_start: u16,

    /// Last candidate port (exclusive)
    ///
    /// Default: `default_range_end()` (60000)
    #[serde(default = "default_range_end")]
    pub range_end: u16,

    /// How many candidates are bind-tested before allocation gives up
    ///
    /// Default: `default_max_attempts()` (1000)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            range_start: default_range_start(),
            range_end: default_range_end(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PortConfig {
    pub fn range(&self) -> Range<u16> {
        self.range_start..self.range_end
    }

    pub fn validate(&self) -> Result<()> {
        if self.range_start == 0 {
            return Err(Error::Config(ConfigError::Message(
                "range_start must be a non-zero port".into(),
            )));
        }

        if self.range_start >= self.range_end {
            return Err(Error::Config(ConfigError::Message(format!(
                "port range {}..{} is empty",
                self.range_start, self.range_end
            ))));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_attempts must be greater than 0".into(),
            )));
        }

        Ok(())
    }
}

fn default_range_start() -> u16 {
    DEFAULT_PORT_RANGE_START
}
fn default_range_end() -> u16 {
    DEFAULT_PORT_RANGE_END
}
fn default_max_attempts() -> usize {
    DEFAULT_PORT_MAX_ATTEMPTS
}
