//! Shared membership view every node of an ensemble is configured with.
//!
//! The view is computed once per `start()` and handed to all nodes behind an
//! `Arc`, so every node observes the same ids, addresses and quorum rules.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use super::MajorityQuorum;
use crate::net::loopback;
use crate::InstanceSpec;

/// Peer addresses of one ensemble member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumServer {
    pub id: u64,
    /// Address followers use to talk to the leader
    pub addr: SocketAddr,
    /// Address used for leader election
    pub election_addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipView {
    servers: BTreeMap<u64, QuorumServer>,
    /// client port -> server id
    client_ports: BTreeMap<u16, u64>,
    verifier: MajorityQuorum,
}

impl MembershipView {
    /// Assigns ids `1..=N` in iteration order and resolves every member's
    /// quorum and election address on loopback.
    pub fn build<'a>(specs: impl IntoIterator<Item = &'a InstanceSpec>) -> Self {
        let mut servers = BTreeMap::new();
        let mut client_ports = BTreeMap::new();

        for spec in specs {
            let id = servers.len() as u64 + 1;
            servers.insert(
                id,
                QuorumServer {
                    id,
                    addr: loopback(spec.quorum_port()),
                    election_addr: loopback(spec.election_port()),
                },
            );
            client_ports.insert(spec.port(), id);
        }

        let verifier = MajorityQuorum::new(servers.len());
        Self {
            servers,
            client_ports,
            verifier,
        }
    }

    pub fn servers(&self) -> &BTreeMap<u64, QuorumServer> {
        &self.servers
    }

    pub fn server(
        &self,
        id: u64,
    ) -> Option<&QuorumServer> {
        self.servers.get(&id)
    }

    /// Id assigned to the member listening for clients on `port`
    pub fn server_id_of(
        &self,
        client_port: u16,
    ) -> Option<u64> {
        self.client_ports.get(&client_port).copied()
    }

    pub fn contains(
        &self,
        id: u64,
    ) -> bool {
        self.servers.contains_key(&id)
    }

    pub fn verifier(&self) -> &MajorityQuorum {
        &self.verifier
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
