use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Daily delivery window for expiry notifications.
///
/// The window opens at `start_hour:00` local time and stays open for
/// `width_hours`, half-open: `start <= t < start + width`. Expressed as a
/// pure predicate over a timestamp so it can be tested without touching the
/// scheduler loop or the system clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NotifyWindow {
    pub start_hour: u32,
    pub width_hours: u32,
}

impl Default for NotifyWindow {
    fn default() -> Self {
        Self {
            start_hour: 10,
            width_hours: 1,
        }
    }
}

impl NotifyWindow {
    pub fn new(start_hour: u32, width_hours: u32) -> Self {
        Self {
            start_hour,
            width_hours,
        }
    }

    /// Whether `now` falls inside today's window.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        let Some(start) = now.date().and_hms_opt(self.start_hour, 0, 0) else {
            return false;
        };
        let since_start = now - start;
        since_start >= Duration::zero()
            && since_start < Duration::hours(i64::from(self.width_hours))
    }
}
