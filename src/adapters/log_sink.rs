//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the `log`
//! facade with the console tags operators know from the device bridge
//! (`[ALERT]`, `[EVIDENCE SAVED]`, ...).  A test recorder implements the
//! same trait.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(deployment) => {
                info!("START | {:?} running", deployment);
            }
            AppEvent::LineReceived(line) => {
                info!("[DEVICE] {}", line);
            }
            AppEvent::DebugLine(line) => {
                info!("Debug: {}", line);
            }
            AppEvent::StateChanged { from, to } => {
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertRaised { line, extended } => {
                if *extended {
                    warn!("[ALERT] Intruder detected again, window extended ({})", line);
                } else {
                    warn!("[ALERT] Intruder detected! Capturing evidence...");
                }
            }
            AppEvent::SnapshotSaved(path) => {
                info!("[EVIDENCE SAVED] Location: {}", path.display());
            }
            AppEvent::SnapshotFailed(reason) => {
                error!("[ERROR] Snapshot failed: {}", reason);
            }
            AppEvent::CameraUnavailable(reason) => {
                warn!("[CAMERA] unavailable, running without video: {}", reason);
            }
            AppEvent::DisplayFailed(reason) => {
                warn!("[DISPLAY] frame not shown: {}", reason);
            }
            AppEvent::LogReady {
                path,
                created,
                existing,
            } => {
                if *created {
                    info!("LOG | created {}", path.display());
                } else {
                    info!(
                        "LOG | appending to {} ({} existing records)",
                        path.display(),
                        existing
                    );
                }
            }
            AppEvent::RecordLogged(record) => {
                info!(
                    "[{}] {} detected! Level: {}",
                    record.time, record.event_reason, record.sensor_value
                );
            }
            AppEvent::LogWriteFailed(reason) => {
                warn!("LOG | append failed: {}", reason);
            }
            AppEvent::Stopped(deployment) => {
                info!("STOP | {:?} stopped, channel closed", deployment);
            }
        }
    }
}
