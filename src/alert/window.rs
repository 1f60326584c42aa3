//! Alert window: the time interval during which the overlay stays up.

use chrono::{DateTime, Local, TimeDelta};

/// `active_until` is `None` until the first trigger arms the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertWindow {
    active_until: Option<DateTime<Local>>,
}

impl AlertWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the countdown: `active_until = now + duration`.
    pub fn arm(&mut self, now: DateTime<Local>, duration: TimeDelta) {
        self.active_until = Some(now + duration);
    }

    /// `now < active_until`.
    pub fn is_active(&self, now: DateTime<Local>) -> bool {
        self.active_until.is_some_and(|until| now < until)
    }

    pub fn active_until(&self) -> Option<DateTime<Local>> {
        self.active_until
    }
}
