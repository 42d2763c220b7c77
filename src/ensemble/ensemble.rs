//! Manages an internally running ensemble of coordination-engine nodes.
//! FOR TESTING PURPOSES ONLY.
//!
//! ## Key Responsibilities
//! - Builds the shared [`MembershipView`] once per `start()` and launches every
//!   node concurrently, one tokio task per node
//! - Kills single nodes to simulate crashes while the rest keep running
//! - Reclaims temp storage on `close()` / `kill_server()`
//!
//! ## Example Usage
//! ```ignore
//! let ensemble = Ensemble::new(3, |_spec| MyEngine::default())?;
//! let _handles = ensemble.start()?;
//! let client = connect(&ensemble.connect_string()).await?;
//! let victim = ensemble.find_connection_instance(&client).unwrap();
//! ensemble.kill_server(&victim).await;
//! ensemble.close().await;
//! ```

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;
use tracing::info;
use tracing::info_span;
use tracing::warn;
use tracing::Instrument;

use super::EnsembleBuilder;
use super::LaunchHandle;
use crate::file_io::delete_dir_recursively;
use crate::file_io::delete_dir_recursively_blocking;
use crate::format_connect_string;
use crate::ConnectedClient;
use crate::CoordinationEngine;
use crate::EnsembleConfig;
use crate::Error;
use crate::InstanceSpec;
use crate::MembershipView;
use crate::NodeConfig;
use crate::NodeRuntime;
use crate::NodeState;
use crate::Result;

struct EnsembleEntry<E> {
    runtime: Arc<NodeRuntime<E>>,
    instance: InstanceSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Started,
    Closed,
}

struct Lifecycle {
    phase: Phase,
    membership: Option<Arc<MembershipView>>,
    tasks: Vec<AbortHandle>,
}

pub struct Ensemble<E>
where
    E: CoordinationEngine,
{
    entries: Vec<EnsembleEntry<E>>,
    config: EnsembleConfig,
    runtime: Option<Handle>,
    lifecycle: Mutex<Lifecycle>,
}

impl<E> Ensemble<E>
where
    E: CoordinationEngine,
{
    /// Creates an ensemble of `count` servers, each with random ports and a
    /// temp data directory that is deleted on close.
    pub fn new<F>(
        count: usize,
        factory: F,
    ) -> Result<Self>
    where
        F: FnMut(&InstanceSpec) -> E,
    {
        EnsembleBuilder::new(factory).random_instances(count).build()
    }

    /// Creates an ensemble from the given specs. Input order determines
    /// server ids. Ports must not collide; this is not checked.
    pub fn with_instances<F>(
        specs: impl IntoIterator<Item = InstanceSpec>,
        factory: F,
    ) -> Result<Self>
    where
        F: FnMut(&InstanceSpec) -> E,
    {
        EnsembleBuilder::new(factory).instances(specs).build()
    }

    pub fn builder<F>(factory: F) -> EnsembleBuilder<E, F>
    where
        F: FnMut(&InstanceSpec) -> E,
    {
        EnsembleBuilder::new(factory)
    }

    pub(super) fn from_parts(
        entries: Vec<(InstanceSpec, E)>,
        config: EnsembleConfig,
        runtime: Option<Handle>,
    ) -> Self {
        let entries = entries
            .into_iter()
            .map(|(instance, engine)| EnsembleEntry {
                runtime: Arc::new(NodeRuntime::new(engine)),
                instance,
            })
            .collect();

        Self {
            entries,
            config,
            runtime,
            lifecycle: Mutex::new(Lifecycle {
                phase: Phase::Created,
                membership: None,
                tasks: Vec::new(),
            }),
        }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Returns the servers of the ensemble
    pub fn instances(&self) -> Vec<InstanceSpec> {
        self.entries.iter().map(|e| e.instance.clone()).collect()
    }

    /// Returns the connection string to hand to a client
    pub fn connect_string(&self) -> String {
        format_connect_string(self.entries.iter().map(|e| e.instance.port()))
    }

    /// Membership view built by `start()`
    pub fn membership(&self) -> Option<Arc<MembershipView>> {
        self.lifecycle.lock().membership.clone()
    }

    /// Server id assigned to `instance` by `start()`
    pub fn server_id(
        &self,
        instance: &InstanceSpec,
    ) -> Option<u64> {
        self.membership()?.server_id_of(instance.port())
    }

    pub fn node_state(
        &self,
        instance: &InstanceSpec,
    ) -> Option<NodeState> {
        self.entry(instance).map(|e| e.runtime.state())
    }

    /// Engine of the entry matching `instance`
    pub fn engine(
        &self,
        instance: &InstanceSpec,
    ) -> Option<&E> {
        self.entry(instance).map(|e| e.runtime.engine())
    }

    /// Starts the ensemble. The ensemble must be started before use.
    ///
    /// Every node is launched on its own task and this returns once all tasks
    /// are spawned, not once the nodes have formed a quorum. Launch failures
    /// surface only through the returned handles.
    ///
    /// # Errors
    /// - `Error::AlreadyStarted` on a second call
    /// - `Error::Closed` after `close()`
    pub fn start(&self) -> Result<Vec<LaunchHandle>> {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.phase {
            Phase::Created => {}
            Phase::Started => return Err(Error::AlreadyStarted),
            Phase::Closed => return Err(Error::Closed),
        }

        let runtime = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(std::io::Error::other)?,
        };

        let membership = Arc::new(MembershipView::build(self.entries.iter().map(|e| &e.instance)));
        info!(
            members = membership.len(),
            connect_string = %self.connect_string(),
            "starting ensemble"
        );

        let mut handles = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let server_id = index as u64 + 1;
            let config = NodeConfig::new(
                server_id,
                &entry.instance,
                membership.clone(),
                &self.config.timing,
            );
            debug!(?config, "assembled node config");

            let node = entry.runtime.clone();
            let span = info_span!("node", server_id, port = entry.instance.port());
            let handle = runtime.spawn(
                async move { node.run(config).await }.instrument(span),
            );

            lifecycle.tasks.push(handle.abort_handle());
            handles.push(LaunchHandle {
                server_id,
                instance: entry.instance.clone(),
                handle,
            });
        }

        lifecycle.membership = Some(membership);
        lifecycle.phase = Phase::Started;
        Ok(handles)
    }

    /// Shuts down the ensemble, frees resources and deletes flagged data
    /// directories. Launch tasks still running afterwards are aborted.
    /// Safe to call more than once and without a prior `start()`.
    pub async fn close(&self) {
        let tasks = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.phase == Phase::Closed {
                return;
            }
            lifecycle.phase = Phase::Closed;
            std::mem::take(&mut lifecycle.tasks)
        };

        info!(members = self.entries.len(), "closing ensemble");
        join_all(self.entries.iter().map(Self::close_entry)).await;

        for task in tasks {
            task.abort();
        }
    }

    /// Kills the given server, simulating an unexpected crash. Every other
    /// server keeps running.
    ///
    /// Returns `false` if no server of the ensemble matches `instance`.
    pub async fn kill_server(
        &self,
        instance: &InstanceSpec,
    ) -> bool {
        match self.entry(instance) {
            Some(entry) => {
                info!(%instance, "killing server");
                Self::close_entry(entry).await;
                true
            }
            None => {
                warn!(%instance, "kill_server: no such server in ensemble");
                false
            }
        }
    }

    /// Given a connected client, returns which server it is talking to
    pub fn find_connection_instance(
        &self,
        client: &impl ConnectedClient,
    ) -> Option<InstanceSpec> {
        let address = client.remote_socket_address()?;
        self.entries
            .iter()
            .find(|e| e.instance.port() == address.port())
            .map(|e| e.instance.clone())
    }

    fn entry(
        &self,
        instance: &InstanceSpec,
    ) -> Option<&EnsembleEntry<E>> {
        self.entries.iter().find(|e| e.instance == *instance)
    }

    async fn close_entry(entry: &EnsembleEntry<E>) {
        let signalled = entry.runtime.shutdown();
        debug!(port = entry.instance.port(), signalled, "node shut down");

        if entry.instance.delete_data_directory_on_close() {
            let path = entry.instance.data_directory();
            if let Err(e) = delete_dir_recursively(path).await {
                warn!(?path, "failed to delete data directory: {:?}", e);
            }
        }
    }
}

impl<E> Drop for Ensemble<E>
where
    E: CoordinationEngine,
{
    fn drop(&mut self) {
        let lifecycle = self.lifecycle.get_mut();
        if lifecycle.phase == Phase::Closed {
            return;
        }
        lifecycle.phase = Phase::Closed;

        debug!("ensemble dropped without close(), cleaning up");
        for entry in &self.entries {
            entry.runtime.shutdown();
            if entry.instance.delete_data_directory_on_close() {
                let path = entry.instance.data_directory();
                if let Err(e) = delete_dir_recursively_blocking(path) {
                    warn!(?path, "failed to delete data directory: {:?}", e);
                }
            }
        }
        for task in lifecycle.tasks.drain(..) {
            task.abort();
        }
    }
}
