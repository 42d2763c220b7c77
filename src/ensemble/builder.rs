//! A builder for assembling an [`Ensemble`] from explicit and generated
//! instances.
//!
//! ## Example
//! ```ignore
//! let ensemble = EnsembleBuilder::new(|_spec| MyEngine::default())
//!     .config(EnsembleConfig::new()?)
//!     .instances(vec![InstanceSpec::new("/tmp/zk1", 2181, 3181, 4181, false)])
//!     .random_instances(2)
//!     .build()?;
//! ```
//!
//! Explicit instances keep their order and come first; generated ones never
//! reuse a port of an explicit instance.

use std::marker::PhantomData;

use tokio::runtime::Handle;
use tracing::debug;

use super::Ensemble;
use crate::generate_specs;
use crate::net::PortAllocator;
use crate::CoordinationEngine;
use crate::EnsembleConfig;
use crate::InstanceSpec;
use crate::Result;

pub struct EnsembleBuilder<E, F> {
    factory: F,
    config: Option<EnsembleConfig>,
    instances: Vec<InstanceSpec>,
    random_instances: usize,
    runtime: Option<Handle>,
    _engine: PhantomData<fn() -> E>,
}

impl<E, F> EnsembleBuilder<E, F>
where
    E: CoordinationEngine,
    F: FnMut(&InstanceSpec) -> E,
{
    /// `factory` creates the not-yet-started engine of every entry.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            config: None,
            instances: Vec::new(),
            random_instances: 0,
            runtime: None,
            _engine: PhantomData,
        }
    }

    /// Defaults to `EnsembleConfig::new()` when not set.
    pub fn config(
        mut self,
        config: EnsembleConfig,
    ) -> Self {
        self.config = Some(config);
        self
    }

    /// Appends explicit instances. Their ports must not collide; this is not checked.
    pub fn instances(
        mut self,
        specs: impl IntoIterator<Item = InstanceSpec>,
    ) -> Self {
        self.instances.extend(specs);
        self
    }

    /// Appends `count` generated instances with random ports and temp storage.
    pub fn random_instances(
        mut self,
        count: usize,
    ) -> Self {
        self.random_instances += count;
        self
    }

    /// Runtime the launch tasks are spawned on. Defaults to the runtime
    /// `start()` is called from.
    pub fn runtime(
        mut self,
        handle: Handle,
    ) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(mut self) -> Result<Ensemble<E>> {
        let config = match self.config {
            Some(config) => config,
            None => EnsembleConfig::new()?,
        }
        .validate()?;

        let mut specs = self.instances;
        if self.random_instances > 0 {
            let mut allocator = PortAllocator::new(config.ports.clone());
            for port in specs.iter().flat_map(InstanceSpec::ports) {
                allocator.reserve(port);
            }
            specs.extend(generate_specs(
                &mut allocator,
                self.random_instances,
                &config.storage,
            )?);
        }

        debug!(instances = specs.len(), "building ensemble");
        let entries = specs
            .into_iter()
            .map(|spec| {
                let engine = (self.factory)(&spec);
                (spec, engine)
            })
            .collect();

        Ok(Ensemble::from_parts(entries, config, self.runtime))
    }
}
