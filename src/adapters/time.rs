//! System clock adapter.

use chrono::{DateTime, Local};

use crate::app::ports::Clock;

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
