//! One supervised coordination-engine node.
//!
//! ## Lifecycle
//! `Created -> Running -> Stopped`, or `Created -> Stopped` when the node is
//! killed before its launch task got to run it. `Stopped` is terminal.
//!
//! `shutdown()` may race with the launch task. When the engine has not yet
//! published its peer, the launch task is cancelled instead.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;

use super::CoordinationEngine;
use super::NodeConfig;
use crate::Error;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Created,
    Running,
    Stopped,
}

pub struct NodeRuntime<E> {
    engine: E,
    state: Mutex<NodeState>,
    cancel: CancellationToken,
}

impl<E> NodeRuntime<E>
where
    E: CoordinationEngine,
{
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: Mutex::new(NodeState::Created),
            cancel: CancellationToken::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> NodeState {
        *self.state.lock()
    }

    /// Runs the engine until it is shut down.
    ///
    /// # Errors
    /// - `Error::AlreadyStarted` if another call is already running the node
    /// - `Error::NodeStopped` if the node was stopped before this call
    /// - `Error::Config` if `config` fails validation; the node is stopped
    /// - `Error::Launch` if the engine itself fails
    pub async fn run(
        &self,
        config: NodeConfig,
    ) -> Result<()> {
        let server_id = config.server_id;
        {
            let mut state = self.state.lock();
            match *state {
                NodeState::Created => *state = NodeState::Running,
                NodeState::Running => return Err(Error::AlreadyStarted),
                NodeState::Stopped => return Err(Error::NodeStopped { server_id }),
            }
        }

        if let Err(e) = config.validate() {
            error!("Node({}) rejected its config: {:?}", server_id, e);
            *self.state.lock() = NodeState::Stopped;
            return Err(e);
        }

        let result = tokio::select! {
            result = self.engine.run_from_config(config) => {
                result.map_err(|e| {
                    error!("Node({}) failed to run: {:?}", server_id, e);
                    Error::launch(server_id, e)
                })
            }
            _ = self.cancel.cancelled() => {
                debug!("Node({}) cancelled before its peer was available", server_id);
                Ok(())
            }
        };

        *self.state.lock() = NodeState::Stopped;
        result
    }

    /// Signals the node to stop. Returns `false` if it was already stopped.
    pub fn shutdown(&self) -> bool {
        let previous = std::mem::replace(&mut *self.state.lock(), NodeState::Stopped);
        match previous {
            NodeState::Stopped => false,
            NodeState::Created => {
                self.cancel.cancel();
                true
            }
            NodeState::Running => {
                match self.engine.quorum_peer() {
                    Some(peer) => peer.shutdown(),
                    None => self.cancel.cancel(),
                }
                true
            }
        }
    }
}
