//! Ensemble Error Hierarchy
//!
//! Errors raised while assembling or launching an ensemble. Teardown paths
//! (`close`, `kill_server`) never surface errors; they log and move on.

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Disk or socket failures while preparing instances
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Ensemble or per-node configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No free port could be found inside the configured range
    #[error("No free port found after {attempts} attempts")]
    PortExhausted { attempts: usize },

    /// The ensemble, or a single node of it, is already running
    #[error("Already started")]
    AlreadyStarted,

    /// The ensemble has been closed and cannot be started again
    #[error("Ensemble is closed")]
    Closed,

    /// A launch task reached a node that was already killed or closed
    #[error("Node {server_id} was stopped before it could run")]
    NodeStopped { server_id: u64 },

    /// The coordination engine failed while running a node
    #[error("Node {server_id} failed to run: {source}")]
    Launch {
        server_id: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A launch task panicked or was aborted
    #[error("Launch task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

impl Error {
    /// Wraps an engine failure for the node with the given id.
    pub fn launch(
        server_id: u64,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Launch {
            server_id,
            source: source.into(),
        }
    }

    /// Returns `true` if the launch task was cancelled rather than failing on its own.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::TaskFailed(e) if e.is_cancelled())
    }
}
