use std::collections::HashSet;

/// Decides whether a set of server ids forms a quorum.
pub trait QuorumVerifier: Send + Sync + 'static {
    /// Voting weight of the given server
    fn weight(
        &self,
        server_id: u64,
    ) -> u64;

    /// `true` if the acknowledging servers are enough to make progress
    fn contains_quorum(
        &self,
        server_ids: &HashSet<u64>,
    ) -> bool;
}

/// Strict majority of a fixed member count: `floor(N/2) + 1` servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorityQuorum {
    members: usize,
}

impl MajorityQuorum {
    pub fn new(members: usize) -> Self {
        Self { members }
    }

    pub fn members(&self) -> usize {
        self.members
    }

    /// Minimum number of agreeing servers
    pub fn majority_count(&self) -> usize {
        (self.members / 2) + 1
    }
}

impl QuorumVerifier for MajorityQuorum {
    fn weight(
        &self,
        _server_id: u64,
    ) -> u64 {
        1
    }

    fn contains_quorum(
        &self,
        server_ids: &HashSet<u64>,
    ) -> bool {
        server_ids.len() > self.members / 2
    }
}
