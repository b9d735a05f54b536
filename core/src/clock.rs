//! Wall-clock abstraction.
//!
//! Cooldowns, effect expiry, passive-income accrual, and loan due dates
//! are all real-time quantities, so the engine reads time through a trait
//! rather than calling the platform clock directly. Tests drive a
//! ManualClock; production uses SystemClock.

use crate::types::EpochMs;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> EpochMs;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as EpochMs)
            .unwrap_or(0)
    }
}

/// A manually advanced clock for tests.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: EpochMs) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, delta_ms: EpochMs) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: EpochMs) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> EpochMs {
        self.now.load(Ordering::SeqCst)
    }
}

pub const MINUTE_MS: EpochMs = 60 * 1000;
pub const HOUR_MS: EpochMs = 60 * MINUTE_MS;
pub const DAY_MS: EpochMs = 24 * HOUR_MS;
