//! Logger deployment: serial lines straight into the durable CSV log.
//!
//! ```text
//!  LineSource ──▶ SerialEventSource ──▶ LoggerService ──▶ CsvEventLog
//!                                             │
//!                                             └──▶ EventSink (console echo)
//! ```
//!
//! Single execution context.  Only strict `<reason>,<number>` triggers are
//! logged; everything else is echoed as debug text.  A failed append is
//! reported and the loop keeps going.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::event_log::{CsvEventLog, InitOutcome, LogRecord};
use crate::serial::{Poll, SerialEventSource};

use super::events::{AppEvent, Deployment};
use super::ports::{Clock, EventSink, LineSource};

/// Result of one [`LoggerService::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoggerStep {
    /// A trigger row was appended.
    Logged(LogRecord),
    /// A trigger arrived but the append failed.
    WriteFailed,
    /// A non-trigger line was echoed.
    Debug,
    /// Unreadable input was discarded.
    Dropped,
    /// Nothing pending.
    Idle,
    /// The channel is closed.
    Closed,
}

pub struct LoggerService<S, C> {
    source: SerialEventSource<S, C>,
    log: CsvEventLog,
}

impl<S: LineSource, C: Clock> LoggerService<S, C> {
    pub fn new(source: SerialEventSource<S, C>, log: CsvEventLog) -> Self {
        Self { source, log }
    }

    pub fn log(&self) -> &CsvEventLog {
        &self.log
    }

    pub fn source(&self) -> &SerialEventSource<S, C> {
        &self.source
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Make sure the log exists with its header, then announce the start.
    ///
    /// A failure here is reported, not fatal: the next append retries the
    /// initialization.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        match self.log.initialize() {
            Ok(outcome) => {
                let existing = match outcome {
                    InitOutcome::Created => 0,
                    InitOutcome::AlreadyExists => self.log.count().unwrap_or(0),
                };
                sink.emit(&AppEvent::LogReady {
                    path: self.log.path().to_path_buf(),
                    created: outcome == InitOutcome::Created,
                    existing,
                });
            }
            Err(e) => sink.emit(&AppEvent::LogWriteFailed(format!(
                "{}: {e}",
                self.log.path().display()
            ))),
        }
        sink.emit(&AppEvent::Started(Deployment::Logger));
    }

    /// Read and handle at most one line.
    pub fn step(&mut self, sink: &mut impl EventSink) -> LoggerStep {
        let event = match self.source.poll() {
            Poll::Line(event) => event,
            Poll::Dropped => return LoggerStep::Dropped,
            Poll::Idle => return LoggerStep::Idle,
            Poll::Closed => return LoggerStep::Closed,
        };

        let Some(record) = LogRecord::from_event(&event) else {
            sink.emit(&AppEvent::DebugLine(event.raw_text));
            return LoggerStep::Debug;
        };

        match self.log.append(&record) {
            Ok(()) => {
                sink.emit(&AppEvent::RecordLogged(record.clone()));
                LoggerStep::Logged(record)
            }
            Err(e) => {
                sink.emit(&AppEvent::LogWriteFailed(format!(
                    "{}: {e}",
                    self.log.path().display()
                )));
                LoggerStep::WriteFailed
            }
        }
    }

    /// Step until nothing is pending.  Returns the number of rows logged.
    ///
    /// Used for recorded captures, where "nothing pending" means end of input.
    pub fn drain(&mut self, sink: &mut impl EventSink) -> usize {
        let mut logged = 0;
        loop {
            match self.step(sink) {
                LoggerStep::Logged(_) => logged += 1,
                LoggerStep::Idle | LoggerStep::Closed => return logged,
                LoggerStep::WriteFailed | LoggerStep::Debug | LoggerStep::Dropped => {}
            }
        }
    }

    /// Loop while `running` holds, then close the channel.
    pub fn run(&mut self, running: &AtomicBool, sink: &mut impl EventSink) {
        while running.load(Ordering::Relaxed) {
            match self.step(sink) {
                LoggerStep::Idle => self.source.back_off(),
                LoggerStep::Closed => break,
                _ => {}
            }
        }
        self.stop(sink);
    }

    /// Close the channel and announce the stop.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        if self.source.channel().close() {
            debug!("Logger: channel closed");
        }
        sink.emit(&AppEvent::Stopped(Deployment::Logger));
    }
}
