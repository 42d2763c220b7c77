use tokio::task::JoinHandle;

use crate::InstanceSpec;
use crate::Result;

/// Handle to the task running one node, as returned by `Ensemble::start()`.
///
/// Launch failures are observable only here. Dropping the handle detaches
/// the task; the node keeps running until the ensemble stops it.
#[derive(Debug)]
pub struct LaunchHandle {
    pub(super) server_id: u64,
    pub(super) instance: InstanceSpec,
    pub(super) handle: JoinHandle<Result<()>>,
}

impl LaunchHandle {
    pub fn server_id(&self) -> u64 {
        self.server_id
    }

    pub fn instance(&self) -> &InstanceSpec {
        &self.instance
    }

    /// `true` once the node's run call has returned or the task was aborted
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the node's run call to return.
    ///
    /// # Errors
    /// - `Error::Launch` if the engine failed
    /// - `Error::NodeStopped` if the node had already been stopped
    /// - `Error::TaskFailed` if the task panicked or was aborted by `close()`
    pub async fn join(self) -> Result<()> {
        self.handle.await?
    }
}
