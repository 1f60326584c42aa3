//! Port traits: the hexagonal boundary between the bridge logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SerialEventSource / Viewer / LoggerService
//! ```
//!
//! Driven adapters (serial device, camera, display, clock, event sinks)
//! implement these traits.  The services consume them via generics, so the
//! core never touches a device directly and runs unchanged under test mocks.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::Error;
use crate::video::Frame;

// ───────────────────────────────────────────────────────────────
// Line source port (driven adapter: serial device → core)
// ───────────────────────────────────────────────────────────────

/// Newline-delimited byte channel.
pub trait LineSource {
    /// Read one line if input is available.
    ///
    /// `Ok(None)` means nothing is pending right now.  The returned bytes
    /// may still carry the line terminator.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).read_line()
    }
}

// ───────────────────────────────────────────────────────────────
// Frame source port (driven adapter: camera → core)
// ───────────────────────────────────────────────────────────────

/// Camera capture device.
pub trait FrameSource {
    /// Grab the next frame.
    ///
    /// `Ok(None)` is a transient miss (the cycle is skipped); `Err` is an
    /// unrecoverable capture failure and ends the viewer loop.
    fn read_frame(&mut self) -> Result<Option<Frame>, Error>;

    /// Release the device.  Called once on shutdown.
    fn release(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

// ───────────────────────────────────────────────────────────────
// Display surface port (driven adapter: core → operator)
// ───────────────────────────────────────────────────────────────

/// Live feed output plus local key input.
pub trait DisplaySurface {
    /// Present a composited frame.
    fn show(&mut self, frame: &Frame) -> Result<(), Error>;

    /// Wait up to `timeout` for a key press.
    fn wait_key(&mut self, timeout: Duration) -> Option<char>;

    /// Close the surface.  Called once on shutdown.
    fn close(&mut self) {}
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for Box<T> {
    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        (**self).show(frame)
    }

    fn wait_key(&mut self, timeout: Duration) -> Option<char> {
        (**self).wait_key(timeout)
    }

    fn close(&mut self) {
        (**self).close();
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock time, injectable so the alert window is testable.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → console / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
