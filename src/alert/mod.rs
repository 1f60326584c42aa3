//! Alert/display controller.
//!
//! Two-state machine stepped once per displayed frame:
//!
//! ```text
//!            alert line in slot
//!   ┌──────┐ ─────────────────▶ ┌──────────┐ ──┐ alert line in slot
//!   │ Idle │                    │ Alerting │ ◀─┘ (window restarts)
//!   └──────┘ ◀───────────────── └──────────┘
//!            now >= active_until
//! ```
//!
//! The controller is pure: it is handed the wall-clock time and whatever it
//! took out of the slot, and answers with a [`FrameDecision`].  The caller
//! performs the snapshot and overlay side effects.

pub mod window;

use chrono::{DateTime, Local, TimeDelta};

use crate::events::Event;
use window::AlertWindow;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Idle,
    Alerting,
}

/// What the caller must do with the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDecision {
    /// Alert event to snapshot for this frame.
    pub fire: Option<Event>,
    /// `true` when `fire` arrived while the window was already open.
    pub extended: bool,
    /// Composite the overlay onto the displayed frame.
    pub overlay: bool,
    pub from: StateId,
    pub to: StateId,
}

impl FrameDecision {
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

pub struct AlertController {
    state: StateId,
    window: AlertWindow,
    duration: TimeDelta,
    keyword: String,
}

impl AlertController {
    pub fn new(keyword: impl Into<String>, duration: TimeDelta) -> Self {
        Self {
            state: StateId::Idle,
            window: AlertWindow::new(),
            duration,
            keyword: keyword.into(),
        }
    }

    /// Advance one frame.
    ///
    /// `latest` is the slot content the caller just took (already cleared),
    /// so a given event can fire at most once.  Any event whose raw text
    /// contains the keyword fires, whatever its field structure.
    pub fn step(&mut self, now: DateTime<Local>, latest: Option<Event>) -> FrameDecision {
        let from = self.state;
        let fire = latest.filter(|e| e.mentions(&self.keyword));
        let extended = fire.is_some() && self.window.is_active(now);

        if fire.is_some() {
            self.window.arm(now, self.duration);
        }

        self.state = if self.window.is_active(now) {
            StateId::Alerting
        } else {
            StateId::Idle
        };

        FrameDecision {
            fire,
            extended,
            overlay: self.state == StateId::Alerting,
            from,
            to: self.state,
        }
    }

    /// Re-evaluate the window without consuming the slot (no-frame cycles).
    pub fn refresh(&mut self, now: DateTime<Local>) -> Option<(StateId, StateId)> {
        let from = self.state;
        self.state = if self.window.is_active(now) {
            StateId::Alerting
        } else {
            StateId::Idle
        };
        (from != self.state).then_some((from, self.state))
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn active_until(&self) -> Option<DateTime<Local>> {
        self.window.active_until()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}
