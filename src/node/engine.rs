//! Seams to the wrapped coordination engine.
//!
//! The ensemble never implements any part of the consensus protocol. It only
//! needs something it can run with a [`NodeConfig`] and later tell to stop.

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::NodeConfig;

/// Failure type engines report from [`CoordinationEngine::run_from_config`]
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// Live peer state of a running node
#[cfg_attr(test, automock)]
pub trait QuorumPeer: Send + Sync + 'static {
    /// Tears down the peer. Called from a different task than the one running
    /// the node; `run_from_config` is expected to return soon afterwards.
    fn shutdown(&self);
}

/// Process entry point of one coordination-engine node
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CoordinationEngine: Send + Sync + 'static {
    /// Runs the node until its peer is shut down.
    async fn run_from_config(
        &self,
        config: NodeConfig,
    ) -> std::result::Result<(), EngineError>;

    /// The live peer, once `run_from_config` has created it.
    fn quorum_peer(&self) -> Option<Arc<dyn QuorumPeer>>;
}
