//! Latest-event slot shared by the serial thread and the viewer loop.
//!
//! ```text
//! ┌──────────────┐  publish (overwrite)  ┌──────────┐  take (read + clear)  ┌──────────────┐
//! │ Serial thread│──────────────────────▶│   slot   │──────────────────────▶│ Viewer loop  │
//! └──────────────┘                       └──────────┘                       └──────────────┘
//! ```
//!
//! Holds at most one [`Event`].  A publish replaces whatever is pending, so
//! a trigger that is overwritten before the viewer reads it is lost.  There
//! is deliberately no queue behind it.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::events::Event;

/// Single-value, overwrite-on-write, clear-on-read cell.
pub struct LatestEventSlot {
    cell: Signal<CriticalSectionRawMutex, Event>,
}

impl Default for LatestEventSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LatestEventSlot {
    pub const fn new() -> Self {
        Self {
            cell: Signal::new(),
        }
    }

    /// Store `event`, replacing any unread one.
    pub fn publish(&self, event: Event) {
        self.cell.signal(event);
    }

    /// Read and clear.  Returns `None` if nothing arrived since the last take.
    pub fn take(&self) -> Option<Event> {
        self.cell.try_take()
    }

    /// Whether an unread event is pending.
    pub fn is_pending(&self) -> bool {
        self.cell.signaled()
    }
}
