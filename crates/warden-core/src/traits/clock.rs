//! Time source abstraction.
//!
//! Policy windows and token timestamps are evaluated against an injected
//! [`Clock`] so that time-dependent behaviour can be exercised with a
//! [`ManualClock`].

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Months, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug + 'static {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Creates a clock frozen at the current wall-clock second.
    pub fn starting_now() -> Self {
        let now = Utc::now();
        Self::new(DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now))
    }

    /// Jumps to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.write() {
            *guard = instant;
        }
    }

    /// Moves the clock forward (or backward for negative values).
    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.write() {
            *guard += by;
        }
    }

    /// Moves the clock forward by calendar months.
    pub fn advance_months(&self, months: u32) {
        if let Ok(mut guard) = self.now.write() {
            if let Some(next) = guard.checked_add_months(Months::new(months)) {
                *guard = next;
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
