//! Minimum spacing between notification attempts.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Rate-limiting gate in front of the dispatcher.
///
/// - Never dispatched: always open.
/// - Otherwise open once `min_interval` has elapsed since the last recorded dispatch.
/// - A zero `min_interval` is always open.
///
/// Time is always passed in, so the gate never reads the wall clock itself.
#[derive(Debug, Clone)]
pub struct NotificationGate {
    min_interval: TimeDelta,
    last_dispatch: Option<DateTime<Utc>>,
}

impl NotificationGate {
    /// Intervals too large for `chrono` saturate to the maximum representable span.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval: TimeDelta::from_std(min_interval).unwrap_or(TimeDelta::MAX),
            last_dispatch: None,
        }
    }

    /// Check if a notification may be sent at `now`. Does NOT mutate state.
    pub fn may_notify(&self, now: DateTime<Utc>) -> bool {
        if self.min_interval.is_zero() {
            return true;
        }
        match self.last_dispatch {
            None => true,
            Some(last) => now.signed_duration_since(last) >= self.min_interval,
        }
    }

    /// Record a dispatch attempt at `now`.
    ///
    /// The stored timestamp never moves backwards, even if `now` does.
    pub fn record_dispatch(&mut self, now: DateTime<Utc>) {
        self.last_dispatch = Some(match self.last_dispatch {
            Some(last) if last > now => last,
            _ => now,
        });
    }

    pub fn last_dispatch(&self) -> Option<DateTime<Utc>> {
        self.last_dispatch
    }

    /// Earliest instant at which the gate reopens, if it has ever been closed.
    pub fn next_allowed_at(&self) -> Option<DateTime<Utc>> {
        self.last_dispatch
            .and_then(|last| last.checked_add_signed(self.min_interval))
    }
}
