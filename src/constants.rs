// -
// Network

/// Host name every ensemble member is reachable under in connect strings
pub const LOOPBACK_HOST: &str = "localhost";

/// Separator between `host:port` segments of a connect string
pub(crate) const CONNECT_STRING_SEPARATOR: &str = ",";

// -
// Test timings

/// Heartbeat interval handed to every node, in milliseconds
pub(crate) const DEFAULT_TICK_TIME_MS: u64 = 2000;

/// Ticks a follower may lag behind the leader
pub(crate) const DEFAULT_SYNC_LIMIT: u32 = 5;

/// Ticks a follower may take to connect and sync on startup
pub(crate) const DEFAULT_INIT_LIMIT: u32 = 10;

// -
// Port allocation

pub(crate) const DEFAULT_PORT_RANGE_START: u16 = 10000;
pub(crate) const DEFAULT_PORT_RANGE_END: u16 = 60000;
pub(crate) const DEFAULT_PORT_MAX_ATTEMPTS: usize = 1000;

// -
// Storage

pub(crate) const DEFAULT_DATA_DIR_PREFIX: &str = "ensemble-";

/// Environment variable naming an extra configuration file
pub(crate) const CONFIG_PATH_ENV: &str = "ENSEMBLE_CONFIG_PATH";

/// Prefix of environment variable overrides, e.g. `ENSEMBLE__TIMING__TICK_TIME_MS`
pub(crate) const CONFIG_ENV_PREFIX: &str = "ENSEMBLE";
