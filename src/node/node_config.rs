use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use config::ConfigError;

use crate::net::loopback;
use crate::Error;
use crate::InstanceSpec;
use crate::MembershipView;
use crate::QuorumServer;
use crate::QuorumVerifier;
use crate::Result;
use crate::TimingConfig;

/// Everything one node is started with.
///
/// Built once per node by the ensemble; the membership view is shared by all
/// nodes of the same `start()`.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub server_id: u64,
    pub data_dir: PathBuf,
    /// Same as `data_dir`: the ensemble does not separate snapshots and logs
    pub data_log_dir: PathBuf,
    pub client_port_address: SocketAddr,
    pub election_port: u16,
    pub membership: Arc<MembershipView>,
    pub tick_time: Duration,
    pub sync_limit: u32,
    pub init_limit: u32,
}

impl NodeConfig {
    pub fn new(
        server_id: u64,
        spec: &InstanceSpec,
        membership: Arc<MembershipView>,
        timing: &TimingConfig,
    ) -> Self {
        let data_dir = spec
            .data_directory()
            .canonicalize()
            .unwrap_or_else(|_| spec.data_directory().to_path_buf());

        Self {
            server_id,
            data_log_dir: data_dir.clone(),
            data_dir,
            client_port_address: loopback(spec.port()),
            election_port: spec.election_port(),
            membership,
            tick_time: timing.tick_time(),
            sync_limit: timing.sync_limit,
            init_limit: timing.init_limit,
        }
    }

    /// Peer table shared by the whole ensemble, including this node
    pub fn servers(&self) -> &BTreeMap<u64, QuorumServer> {
        self.membership.servers()
    }

    /// Quorum rules the node must apply to acknowledgements
    pub fn quorum_verifier(&self) -> &dyn QuorumVerifier {
        self.membership.verifier()
    }

    /// This node's own entry of the peer table
    pub fn own_server(&self) -> Option<&QuorumServer> {
        self.membership.server(self.server_id)
    }

    /// # Errors
    /// Returns `Error::Config` if the node cannot be part of its own membership view
    pub fn validate(&self) -> Result<()> {
        if !self.membership.contains(self.server_id) {
            return Err(Error::Config(ConfigError::Message(format!(
                "server {} not found in membership view",
                self.server_id
            ))));
        }

        if self.client_port_address.port() == 0 {
            return Err(Error::Config(ConfigError::Message(
                "client port must be non-zero".into(),
            )));
        }

        if self.client_port_address.port() == self.election_port {
            return Err(Error::Config(ConfigError::Message(format!(
                "server {} uses port {} for both clients and elections",
                self.server_id, self.election_port
            ))));
        }

        Ok(())
    }
}
