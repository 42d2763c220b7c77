use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::CoordinationEngine;
use crate::EngineError;
use crate::NodeConfig;
use crate::QuorumPeer;

pub struct FakePeer {
    stop_tx: watch::Sender<bool>,
    shutdowns: AtomicUsize,
}

impl QuorumPeer for FakePeer {
    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        let _ = self.stop_tx.send(true);
    }
}

/// Engine that blocks in `run_from_config` until its peer is shut down and
/// remembers the configuration it was started with.
#[derive(Default)]
pub struct FakeEngine {
    fail_with: Option<String>,
    peer: Mutex<Option<Arc<FakePeer>>>,
    config: Mutex<Option<NodeConfig>>,
    finished: AtomicUsize,
}

impl FakeEngine {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn received_config(&self) -> Option<NodeConfig> {
        self.config.lock().clone()
    }

    /// `true` once the peer exists and has not been shut down
    pub fn is_running(&self) -> bool {
        self.peer
            .lock()
            .as_ref()
            .map(|p| !*p.stop_tx.borrow())
            .unwrap_or(false)
    }

    pub fn shutdown_count(&self) -> usize {
        self.peer
            .lock()
            .as_ref()
            .map(|p| p.shutdowns.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// How many times `run_from_config` returned
    pub fn finished_runs(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoordinationEngine for FakeEngine {
    async fn run_from_config(
        &self,
        config: NodeConfig,
    ) -> std::result::Result<(), EngineError> {
        if let Some(message) = &self.fail_with {
            return Err(message.clone().into());
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        *self.config.lock() = Some(config);
        *self.peer.lock() = Some(Arc::new(FakePeer {
            stop_tx,
            shutdowns: AtomicUsize::new(0),
        }));

        let _ = stop_rx.wait_for(|stopped| *stopped).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn quorum_peer(&self) -> Option<Arc<dyn QuorumPeer>> {
        self.peer.lock().clone().map(|p| p as Arc<dyn QuorumPeer>)
    }
}
