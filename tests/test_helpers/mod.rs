//! Shared clock double for integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Mutex, PoisonError};

/// Clock pinned to an instant that scenarios move forward explicitly.
#[derive(Debug)]
pub struct PinnedClock {
    now: Mutex<DateTime<Utc>>,
}

impl PinnedClock {
    /// Pins the clock at midday UTC on Wednesday 2026-03-11.
    #[must_use]
    pub fn midweek() -> Self {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 11, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for PinnedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `n` whole days.
#[must_use]
pub fn days(n: i64) -> TimeDelta {
    TimeDelta::try_days(n).unwrap_or_default()
}
