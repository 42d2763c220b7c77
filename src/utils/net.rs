use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::net::TcpListener;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tokio::net::TcpStream;
use tokio::time;
use tracing::debug;
use tracing::warn;

use crate::Error;
use crate::PortConfig;
use crate::Result;

/// Loopback socket address for the given port
pub fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

/// Hands out random ports that are free on the host and never repeats one.
///
/// A candidate is accepted only after a successful bind on loopback. The
/// bind is released immediately, so the guarantee holds at allocation time
/// only.
pub struct PortAllocator {
    config: PortConfig,
    allocated: HashSet<u16>,
    rng: StdRng,
}

impl PortAllocator {
    pub fn new(config: PortConfig) -> Self {
        Self {
            config,
            allocated: HashSet::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Ports already handed out by this allocator
    pub fn allocated(&self) -> &HashSet<u16> {
        &self.allocated
    }

    /// Marks a port as taken without bind-testing it.
    pub fn reserve(
        &mut self,
        port: u16,
    ) -> bool {
        self.allocated.insert(port)
    }

    /// # Errors
    /// - `Error::Config` if the configured range is unusable
    /// - `Error::PortExhausted` once `max_attempts` candidates were rejected
    pub fn next_port(&mut self) -> Result<u16> {
        self.config.validate()?;
        let range = self.config.range();
        for attempt in 1..=self.config.max_attempts {
            let candidate = self.rng.gen_range(range.clone());
            if self.allocated.contains(&candidate) {
                continue;
            }

            match TcpListener::bind(loopback(candidate)) {
                Ok(listener) => {
                    drop(listener);
                    self.allocated.insert(candidate);
                    debug!(port = candidate, attempt, "allocated port");
                    return Ok(candidate);
                }
                Err(e) => {
                    warn!(port = candidate, "port candidate rejected: {:?}", e);
                }
            }
        }

        Err(Error::PortExhausted {
            attempts: self.config.max_attempts,
        })
    }
}

pub async fn is_server_ready(addr: SocketAddr) -> bool {
    TcpStream::connect(addr).await.is_ok()
}

/// Polls `addr` until a TCP connection succeeds or `timeout` elapses.
pub async fn wait_for_server(
    addr: SocketAddr,
    timeout: Duration,
) -> std::result::Result<(), std::io::Error> {
    let retry_interval = Duration::from_millis(100);

    let result = time::timeout(timeout, async {
        loop {
            if is_server_ready(addr).await {
                return;
            }
            debug!("Node({:?}) not ready, retrying...", addr);
            time::sleep(retry_interval).await;
        }
    })
    .await;

    result.map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("Node({addr:?}) did not become ready within {timeout:?}"),
        )
    })
}
