//! Identity and footprint of one ensemble member.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::Path;
use std::path::PathBuf;

use crate::file_io::create_temp_data_dir;
use crate::file_io::delete_dir_recursively_blocking;
use crate::net::PortAllocator;
use crate::EnsembleConfig;
use crate::Result;
use crate::StorageConfig;

/// Abstracts one of the servers in the ensemble
///
/// Two specs are equal iff their client ports are equal; the client port is
/// the external identity of a node. Client, election and quorum ports must be
/// unique across the whole ensemble. Explicitly supplied specs are not checked
/// for collisions.
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    data_directory: PathBuf,
    port: u16,
    election_port: u16,
    quorum_port: u16,
    delete_data_directory_on_close: bool,
}

impl InstanceSpec {
    /// # Arguments
    /// * `data_directory` - where to store data and logs
    /// * `port` - client port, unique per ensemble
    /// * `election_port` - election port, unique per ensemble
    /// * `quorum_port` - quorum port, unique per ensemble
    /// * `delete_data_directory_on_close` - reclaim `data_directory` when the node is shut down
    pub fn new(
        data_directory: impl Into<PathBuf>,
        port: u16,
        election_port: u16,
        quorum_port: u16,
        delete_data_directory_on_close: bool,
    ) -> Self {
        Self {
            data_directory: data_directory.into(),
            port,
            election_port,
            quorum_port,
            delete_data_directory_on_close,
        }
    }

    /// Creates a spec with a fresh temp data directory (deleted on close) and
    /// three ports that `allocator` has never handed out before.
    pub fn random(
        allocator: &mut PortAllocator,
        storage: &StorageConfig,
    ) -> Result<Self> {
        let port = allocator.next_port()?;
        let election_port = allocator.next_port()?;
        let quorum_port = allocator.next_port()?;
        let data_directory = create_temp_data_dir(storage)?;

        Ok(Self::new(data_directory, port, election_port, quorum_port, true))
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn election_port(&self) -> u16 {
        self.election_port
    }

    pub fn quorum_port(&self) -> u16 {
        self.quorum_port
    }

    pub fn delete_data_directory_on_close(&self) -> bool {
        self.delete_data_directory_on_close
    }

    pub fn ports(&self) -> [u16; 3] {
        [self.port, self.election_port, self.quorum_port]
    }
}

impl PartialEq for InstanceSpec {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.port == other.port
    }
}

impl Eq for InstanceSpec {}

impl Hash for InstanceSpec {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.port.hash(state);
    }
}

impl fmt::Display for InstanceSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "Port: {}, electionPort: {}, quorumPort: {}, dataDirectory: {}",
            self.port,
            self.election_port,
            self.quorum_port,
            self.data_directory.display()
        )
    }
}

/// Generates `count` specs whose ports are pairwise distinct across all three
/// categories, each with its own temp data directory.
pub fn make_specs(
    count: usize,
    config: &EnsembleConfig,
) -> Result<Vec<InstanceSpec>> {
    let mut allocator = PortAllocator::new(config.ports.clone());
    generate_specs(&mut allocator, count, &config.storage)
}

/// Like [`make_specs`], drawing ports from an existing allocator so that ports
/// it already handed out or reserved are avoided. On failure, directories
/// created so far are removed again.
pub fn generate_specs(
    allocator: &mut PortAllocator,
    count: usize,
    storage: &StorageConfig,
) -> Result<Vec<InstanceSpec>> {
    let mut specs = Vec::with_capacity(count);
    for _ in 0..count {
        match InstanceSpec::random(allocator, storage) {
            Ok(spec) => specs.push(spec),
            Err(e) => {
                for spec in &specs {
                    let _ = delete_dir_recursively_blocking(spec.data_directory());
                }
                return Err(e);
            }
        }
    }
    Ok(specs)
}
