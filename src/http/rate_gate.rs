//! Process-wide request spacing
//!
//! The remote quota (2 requests per second) is enforced per client process,
//! not per collection, so every fetch funnels through one shared gate. The
//! gate is a governor GCRA limiter with a burst of one: a dispatch is allowed
//! only once the configured interval has elapsed since the previous one.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default spacing between two dispatches (2 requests/second)
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

static GLOBAL_GATE: Lazy<RateGate> = Lazy::new(|| RateGate::new(&RateGateConfig::default()));

/// Configuration for the rate gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateGateConfig {
    /// Minimum time between two dispatched requests; zero disables the gate
    pub min_interval: Duration,
}

impl Default for RateGateConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl RateGateConfig {
    /// Create a config with the given spacing
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Create a config from a requests-per-second budget
    pub fn per_second(requests: u32) -> Self {
        let requests = requests.max(1);
        Self {
            min_interval: Duration::from_secs(1) / requests,
        }
    }
}

/// Shared throttle enforcing a minimum spacing between outgoing fetches.
///
/// Cloning is cheap and every clone shares the same schedule.
#[derive(Clone)]
pub struct RateGate {
    limiter: Option<Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>>,
    min_interval: Duration,
}

impl RateGate {
    /// Create a new, independent gate
    pub fn new(config: &RateGateConfig) -> Self {
        let limiter = Quota::with_period(config.min_interval)
            .map(|quota| Arc::new(Governor::direct(quota)));

        Self {
            limiter,
            min_interval: config.min_interval,
        }
    }

    /// The process-wide gate shared by every collection and resource load
    pub fn global() -> Self {
        GLOBAL_GATE.clone()
    }

    /// A gate that never waits
    pub fn disabled() -> Self {
        Self {
            limiter: None,
            min_interval: Duration::ZERO,
        }
    }

    /// Suspend until a request may be dispatched, then claim that slot
    pub async fn wait(&self) {
        if let Some(ref limiter) = self.limiter {
            let started = Instant::now();
            limiter.until_ready().await;
            let waited = started.elapsed();
            if waited > Duration::from_millis(1) {
                debug!("Rate gate held request for {:?}", waited);
            }
        }
    }

    /// Claim a slot only if one is free right now
    pub fn try_pass(&self) -> bool {
        match self.limiter {
            Some(ref limiter) => limiter.check().is_ok(),
            None => true,
        }
    }

    /// Wait for a slot, giving up after `timeout`
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }

    /// Configured minimum spacing
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether the gate throttles at all
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Whether two handles share the same schedule
    pub fn shares_schedule_with(&self, other: &RateGate) -> bool {
        match (&self.limiter, &other.limiter) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::global()
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("min_interval", &self.min_interval)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
