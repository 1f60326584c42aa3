//! Outbound application events.
//!
//! The viewer and logger services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them (console log or a test recorder).

use std::path::PathBuf;

use crate::alert::StateId;
use crate::event_log::LogRecord;

/// Which deployment of the serial core is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    /// Camera + overlay + snapshots, no durable log.
    Viewer,
    /// Durable CSV log, no video.
    Logger,
}

/// Structured events emitted by the services.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A deployment has started.
    Started(Deployment),

    /// A line arrived from the device (viewer echo).
    LineReceived(String),

    /// A non-trigger line (logger only prints these).
    DebugLine(String),

    /// The alert controller changed state.
    StateChanged { from: StateId, to: StateId },

    /// An alert line fired; `extended` if the window was already open.
    AlertRaised { line: String, extended: bool },

    /// Snapshot written to this absolute path.
    SnapshotSaved(PathBuf),

    /// Snapshot write failed.
    SnapshotFailed(String),

    /// The camera could not be reached; running without video.
    CameraUnavailable(String),

    /// The display surface rejected a frame.
    DisplayFailed(String),

    /// The durable log is ready.  `existing` counts rows already present.
    LogReady {
        path: PathBuf,
        created: bool,
        existing: usize,
    },

    /// A trigger row was appended.
    RecordLogged(LogRecord),

    /// Appending a trigger row failed.
    LogWriteFailed(String),

    /// The deployment loop ended.
    Stopped(Deployment),
}
