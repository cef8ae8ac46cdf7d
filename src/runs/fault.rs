//! Fault injection for the listing service.
//!
//! After every successful listing the [`FaultInjector`] asks its
//! [`FaultPolicy`] whether to arm a burst of failures. While a burst is armed,
//! each listing call consumes one failure and returns
//! [`RunsError::Transient`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::error::{Result, RunsError};

/// Longest burst of consecutive injected failures.
pub const MAX_FAULT_BURST: u32 = 2;

/// Decides how many upcoming calls should fail.
pub trait FaultPolicy: Send + Sync + fmt::Debug {
    /// Called after a successful listing. Returns the number of upcoming
    /// calls that should fail; 0 leaves the service healthy.
    fn burst_after_success(&self) -> u32;
}

/// Never injects a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFaults;

impl FaultPolicy for NoFaults {
    fn burst_after_success(&self) -> u32 {
        0
    }
}

/// Arms a burst of one or two failures with a fixed probability.
#[derive(Debug)]
pub struct RandomFaults {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomFaults {
    /// `probability` is clamped to `0.0..=1.0`; NaN disables injection.
    #[must_use]
    pub fn new(probability: f64, seed: u64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self {
            probability,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FaultPolicy for RandomFaults {
    fn burst_after_success(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if rng.gen_bool(self.probability) {
            rng.gen_range(1..=MAX_FAULT_BURST)
        } else {
            0
        }
    }
}

/// Replays a fixed script of burst lengths, then stays healthy.
#[derive(Debug, Default)]
pub struct ScriptedFaults {
    script: Mutex<VecDeque<u32>>,
}

impl ScriptedFaults {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl FaultPolicy for ScriptedFaults {
    fn burst_after_success(&self) -> u32 {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(0)
    }
}

/// Shared fault state for one service instance.
///
/// The pending counter is shared across concurrent callers; a race only
/// changes which caller observes an injected failure.
#[derive(Debug)]
pub struct FaultInjector {
    policy: Arc<dyn FaultPolicy>,
    pending: AtomicU32,
}

impl FaultInjector {
    #[must_use]
    pub fn new(policy: Arc<dyn FaultPolicy>) -> Self {
        Self {
            policy,
            pending: AtomicU32::new(0),
        }
    }

    /// Fail if a burst is armed, consuming one failure from it.
    pub fn check(&self) -> Result<()> {
        let consumed = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match consumed {
            Ok(before) => {
                warn!(
                    name: "runs.fault.injected",
                    remaining = before - 1,
                    "Injected transient failure"
                );
                Err(RunsError::Transient)
            }
            Err(_) => Ok(()),
        }
    }

    /// Consult the policy after a successful call.
    pub fn record_success(&self) {
        let burst = self.policy.burst_after_success().min(MAX_FAULT_BURST);
        if burst > 0 {
            debug!(name: "runs.fault.armed", burst, "Fault burst armed");
            self.pending.store(burst, Ordering::Release);
        }
    }

    /// Failures still armed.
    #[must_use]
    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }
}
