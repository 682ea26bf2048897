//! The hysteresis health tracker.

use std::{
    fmt::Display,
    sync::RwLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

#[derive(Debug)]
struct HealthState {
    healthy: bool,
    failures: usize,
    successes: usize,
    last_check: SystemTime,
    fail_total: u64,
    success_total: u64,
}

/// Tracks upstream health with hysteresis: the healthy flag only flips
/// after a configured number of consecutive same-kind outcomes, damping
/// flapping probes. Classification counts outcomes, not elapsed time.
#[derive(Debug)]
pub struct Health {
    state: RwLock<HealthState>,
    success_threshold: usize,
    fail_threshold: usize,
}

impl Health {
    /// Create a tracker; the initial state is unhealthy.
    pub fn new(success_threshold: usize, fail_threshold: usize) -> Health {
        Health {
            state: RwLock::new(HealthState {
                healthy: false,
                failures: 0,
                successes: 0,
                last_check: UNIX_EPOCH,
                fail_total: 0,
                success_total: 0,
            }),
            success_threshold,
            fail_threshold,
        }
    }

    /// Record a successful probe.
    pub fn record_success(&self) {
        if let Ok(mut state) = self.state.write() {
            state.success_total += 1;
            state.last_check = SystemTime::now();
            state.successes += 1;
            state.failures = 0;

            if state.successes >= self.success_threshold {
                state.healthy = true;
            }
        }
    }

    /// Record a failed probe. The error is observed by surrounding metrics
    /// and logging only; it is not retained here.
    pub fn record_fail(&self, _err: &dyn Display) {
        if let Ok(mut state) = self.state.write() {
            state.fail_total += 1;
            state.last_check = SystemTime::now();
            state.failures += 1;
            state.successes = 0;

            if state.failures >= self.fail_threshold {
                state.healthy = false;
            }
        }
    }

    /// Whether the upstream currently counts as healthy.
    pub fn healthy(&self) -> bool {
        self.state.read().map(|state| state.healthy).unwrap_or(false)
    }

    /// Total number of failed probes recorded.
    pub fn failed_total(&self) -> u64 {
        self.state.read().map(|state| state.fail_total).unwrap_or(0)
    }

    /// Total number of successful probes recorded.
    pub fn success_total(&self) -> u64 {
        self.state
            .read()
            .map(|state| state.success_total)
            .unwrap_or(0)
    }

    /// Time since the last recorded probe, if any ran.
    pub fn since_last_check(&self) -> Option<Duration> {
        let last = self.state.read().ok()?.last_check;
        if last == UNIX_EPOCH {
            return None;
        }

        SystemTime::now().duration_since(last).ok()
    }
}
