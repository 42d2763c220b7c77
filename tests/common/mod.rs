use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use d_engine_ensemble::net::wait_for_server;
use d_engine_ensemble::net::loopback;
use d_engine_ensemble::CoordinationEngine;
use d_engine_ensemble::Ensemble;
use d_engine_ensemble::EngineError;
use d_engine_ensemble::EnsembleConfig;
use d_engine_ensemble::LaunchHandle;
use d_engine_ensemble::NodeConfig;
use d_engine_ensemble::QuorumPeer;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const WAIT_FOR_NODE_READY: Duration = Duration::from_secs(5);

pub struct LoopbackPeer {
    stop: CancellationToken,
}

impl QuorumPeer for LoopbackPeer {
    fn shutdown(&self) {
        self.stop.cancel();
    }
}

/// Minimal engine that only serves sockets: it binds the client, election and
/// quorum port of its node and holds every accepted client connection open
/// until shut down.
#[derive(Default)]
pub struct LoopbackEngine {
    peer: Mutex<Option<Arc<LoopbackPeer>>>,
}

#[async_trait]
impl CoordinationEngine for LoopbackEngine {
    async fn run_from_config(
        &self,
        config: NodeConfig,
    ) -> Result<(), EngineError> {
        let own = config
            .own_server()
            .copied()
            .ok_or_else(|| format!("server {} missing from membership", config.server_id))?;

        let client = TcpListener::bind(config.client_port_address).await?;
        let election = TcpListener::bind(own.election_addr).await?;
        let quorum = TcpListener::bind(own.addr).await?;

        let stop = CancellationToken::new();
        *self.peer.lock() = Some(Arc::new(LoopbackPeer { stop: stop.clone() }));
        debug!("Node({}) serving on {}", config.server_id, config.client_port_address);

        let mut connections = Vec::new();
        loop {
            tokio::select! {
                accepted = client.accept() => {
                    let (stream, remote) = accepted?;
                    debug!("Node({}) accepted client {}", config.server_id, remote);
                    connections.push(stream);
                }
                _ = election.accept() => {}
                _ = quorum.accept() => {}
                _ = stop.cancelled() => break,
            }
        }

        drop(client);
        drop(election);
        drop(quorum);
        debug!(
            "Node({}) stopped listening, dropping {} connections",
            config.server_id,
            connections.len()
        );
        Ok(())
    }

    fn quorum_peer(&self) -> Option<Arc<dyn QuorumPeer>> {
        self.peer.lock().clone().map(|p| p as Arc<dyn QuorumPeer>)
    }
}

pub fn test_config(root: &TempDir) -> EnsembleConfig {
    let mut config = EnsembleConfig::default();
    config.storage.temp_root = Some(root.path().to_path_buf());
    config
}

pub fn loopback_ensemble(
    count: usize,
    root: &TempDir,
) -> Ensemble<LoopbackEngine> {
    Ensemble::builder(|_| LoopbackEngine::default())
        .config(test_config(root))
        .random_instances(count)
        .build()
        .expect("build ensemble")
}

/// Waits until every node accepts connections on its client port.
pub async fn check_ensemble_is_ready(ensemble: &Ensemble<LoopbackEngine>) -> io::Result<()> {
    for instance in ensemble.instances() {
        wait_for_server(loopback(instance.port()), WAIT_FOR_NODE_READY).await?;
    }
    Ok(())
}

/// Connects to the first reachable `host:port` of a connect string, the way a
/// real client bootstraps.
pub async fn connect_any(connect_string: &str) -> io::Result<TcpStream> {
    let mut last_error = io::Error::new(io::ErrorKind::InvalidInput, "empty connect string");
    for address in connect_string.split(',') {
        match TcpStream::connect(address).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

/// Waits for every launch task to finish, whether it returned or was aborted.
pub async fn join_all(handles: Vec<LaunchHandle>) {
    for handle in handles {
        if let Err(e) = handle.join().await {
            assert!(e.is_cancelled(), "unexpected launch error: {e}");
        }
    }
}

/// `true` once the server side of `stream` has gone away.
pub async fn is_disconnected(stream: &mut TcpStream) -> bool {
    let mut buf = [0u8; 1];
    match time::timeout(WAIT_FOR_NODE_READY, stream.read(&mut buf)).await {
        Ok(Ok(0)) | Ok(Err(_)) => true,
        Ok(Ok(_)) | Err(_) => false,
    }
}
