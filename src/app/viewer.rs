//! Viewer deployment: the foreground consumer loop.
//!
//! ```text
//!  FrameSource ──▶ ┌──────────────────────────────┐ ──▶ DisplaySurface
//!                  │            Viewer            │
//!  slot.take() ──▶ │  AlertController · Overlay   │ ──▶ SnapshotWriter
//!                  └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! One cycle per captured frame: resize, take whatever the serial thread
//! left in the slot, step the controller, snapshot on fire, composite the
//! overlay while the window is open, show, poll for the quit key.
//!
//! Devices are released exactly once in a fixed order (video, display,
//! channel) on every exit path, including drop after an early abort.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use crate::alert::AlertController;
use crate::config::SystemConfig;
use crate::serial::ChannelCloser;
use crate::slot::LatestEventSlot;
use crate::snapshot::SnapshotWriter;
use crate::video::overlay::Overlay;
use crate::video::{Frame, resize_to};

use super::events::{AppEvent, Deployment};
use super::ports::{Clock, DisplaySurface, EventSink, FrameSource};

/// Key that ends the viewer loop.
pub const QUIT_KEY: char = 'q';

/// Per-cycle key poll.
pub const KEY_POLL: Duration = Duration::from_millis(1);

/// What the loop should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    Quit,
}

pub struct Viewer<F: FrameSource, D: DisplaySurface, C: Clock, K: ChannelCloser> {
    frames: F,
    display: D,
    clock: C,
    channel: K,
    slot: Arc<LatestEventSlot>,
    controller: AlertController,
    snapshots: SnapshotWriter,
    overlay: Overlay,
    width: u32,
    height: u32,
    released: bool,
}

impl<F: FrameSource, D: DisplaySurface, C: Clock, K: ChannelCloser> Viewer<F, D, C, K> {
    pub fn new(
        config: &SystemConfig,
        frames: F,
        display: D,
        clock: C,
        slot: Arc<LatestEventSlot>,
        channel: K,
    ) -> Self {
        let overlay = Overlay::new(
            config.overlay_text.clone(),
            config.overlay_x,
            config.overlay_y,
            config.overlay_scale,
        );
        Self {
            frames,
            display,
            clock,
            channel,
            slot,
            controller: AlertController::new(config.alert_keyword.clone(), config.alert_window()),
            snapshots: SnapshotWriter::new(config.snapshot_dir.clone(), overlay.clone()),
            overlay,
            width: config.frame_width,
            height: config.frame_height,
            released: false,
        }
    }

    pub fn controller(&self) -> &AlertController {
        &self.controller
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Run until the quit key or a capture failure, then release.
    pub fn run(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(Deployment::Viewer));
        info!("[SYSTEM READY] Press '{}' to quit.", QUIT_KEY);
        while self.run_cycle(sink) == CycleOutcome::Continue {}
        self.shutdown();
        sink.emit(&AppEvent::Stopped(Deployment::Viewer));
    }

    /// One foreground iteration.
    pub fn run_cycle(&mut self, sink: &mut impl EventSink) -> CycleOutcome {
        match self.frames.read_frame() {
            Ok(Some(frame)) => self.present(frame, sink),
            Ok(None) => {
                // No frame: the slot is left for the next frame that arrives.
                if let Some((from, to)) = self.controller.refresh(self.clock.now()) {
                    sink.emit(&AppEvent::StateChanged { from, to });
                }
            }
            Err(e) => {
                error!("Viewer: capture failed: {e}");
                return CycleOutcome::Quit;
            }
        }

        if self.display.wait_key(KEY_POLL) == Some(QUIT_KEY) {
            info!("Viewer: quit requested");
            return CycleOutcome::Quit;
        }
        CycleOutcome::Continue
    }

    fn present(&mut self, frame: Frame, sink: &mut impl EventSink) {
        let mut frame = resize_to(frame, self.width, self.height);
        let now = self.clock.now();
        let decision = self.controller.step(now, self.slot.take());

        if let Some(event) = &decision.fire {
            sink.emit(&AppEvent::AlertRaised {
                line: event.raw_text.clone(),
                extended: decision.extended,
            });
            match self.snapshots.write(&frame, event.received_at) {
                Ok(path) => sink.emit(&AppEvent::SnapshotSaved(path)),
                Err(e) => sink.emit(&AppEvent::SnapshotFailed(e.to_string())),
            }
        }
        if decision.changed_state() {
            sink.emit(&AppEvent::StateChanged {
                from: decision.from,
                to: decision.to,
            });
        }

        if decision.overlay {
            self.overlay.draw(&mut frame);
        }
        if let Err(e) = self.display.show(&frame) {
            sink.emit(&AppEvent::DisplayFailed(e.to_string()));
        }
    }

    // ── Shutdown ──────────────────────────────────────────────

    /// Release video, then display, then the serial channel.  Idempotent.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.frames.release();
        self.display.close();
        self.channel.close_channel();
        info!("System Shutdown.");
    }
}

impl<F: FrameSource, D: DisplaySurface, C: Clock, K: ChannelCloser> Drop for Viewer<F, D, C, K> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
