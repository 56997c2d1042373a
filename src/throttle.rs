//! Minimum spacing between outbound price requests.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Sleeps so that consecutive [`wait`](Throttle::wait) calls are at least
/// `min_interval` apart. The first call never sleeps.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Cell<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Cell::new(None),
        }
    }

    /// A throttle that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the interval since the previous call has elapsed.
    ///
    /// Returns how long the call slept.
    pub fn wait(&self) -> Duration {
        let mut slept = Duration::ZERO;
        if let Some(last) = self.last.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                slept = self.min_interval - elapsed;
                debug!(wait_ms = slept.as_millis() as u64, "throttling price request");
                thread::sleep(slept);
            }
        }
        self.last.set(Some(Instant::now()));
        slept
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FETCH_INTERVAL)
    }
}
