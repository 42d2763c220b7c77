//! the test_utils folder here will share utils or test components between unit
//! tests
mod fake_engine;

pub use fake_engine::*;

use std::time::Duration;

use tokio::time::sleep;
use tokio::time::Instant;

/// Polls `condition` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until<F>(
    timeout: Duration,
    mut condition: F,
) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}
