//! Serial event source: the producer side of both deployments.
//!
//! ```text
//!  ┌──────────────┐  bytes   ┌──────────┐  Event   ┌──────────────────────┐
//!  │ LineSource   │────────▶│ decoder  │────────▶│ slot (viewer thread)  │
//!  │ (device)     │          │          │          │ or LoggerService      │
//!  └──────────────┘          └──────────┘          └──────────────────────┘
//! ```
//!
//! The channel sits behind a [`SharedChannel`] so the foreground can close
//! it on shutdown even though the producer thread is detached and never
//! joined.  The producer notices the closed channel on its next poll and
//! exits.
//!
//! Leniency: non-UTF-8 lines, empty lines and transient read errors are
//! dropped without propagation.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::trace;

use crate::app::events::AppEvent;
use crate::app::ports::{Clock, EventSink, LineSource};
use crate::events::{Event, decode_bytes};
use crate::slot::LatestEventSlot;

// ── Shared, closable channel handle ──────────────────────────

/// Channel handle shared between the producer and the shutdown path.
pub struct SharedChannel<S> {
    inner: Arc<Mutex<Option<S>>>,
}

impl<S> Clone for SharedChannel<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedChannel<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(source))),
        }
    }

    /// Run `f` against the open channel.  `None` once closed.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().map(f)
    }

    /// Drop the underlying channel.  Returns `true` if this call closed it.
    pub fn close(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub fn is_open(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Anything the shutdown path can close without knowing the channel type.
pub trait ChannelCloser {
    /// Close the channel.  Returns `true` if this call closed it.
    fn close_channel(&self) -> bool;
}

impl<S> ChannelCloser for SharedChannel<S> {
    fn close_channel(&self) -> bool {
        self.close()
    }
}

// ── Source ───────────────────────────────────────────────────

/// Outcome of one [`SerialEventSource::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    /// A decoded, non-malformed line.
    Line(Event),
    /// Something was read but dropped (malformed bytes).
    Dropped,
    /// Nothing pending, or a transient read error.
    Idle,
    /// The channel has been closed.
    Closed,
}

pub struct SerialEventSource<S, C> {
    channel: SharedChannel<S>,
    clock: C,
    idle_backoff: Duration,
}

impl<S: LineSource, C: Clock> SerialEventSource<S, C> {
    pub fn new(channel: SharedChannel<S>, clock: C, idle_backoff: Duration) -> Self {
        Self {
            channel,
            clock,
            idle_backoff,
        }
    }

    pub fn channel(&self) -> &SharedChannel<S> {
        &self.channel
    }

    /// One iteration: read at most one line and decode it.
    pub fn poll(&mut self) -> Poll {
        match self.channel.with(LineSource::read_line) {
            None => Poll::Closed,
            Some(Ok(Some(bytes))) => {
                let event = decode_bytes(&bytes, self.clock.now());
                if event.is_malformed() {
                    trace!("serial: dropped malformed line ({} bytes)", bytes.len());
                    Poll::Dropped
                } else {
                    Poll::Line(event)
                }
            }
            Some(Ok(None)) => Poll::Idle,
            Some(Err(e)) => {
                trace!("serial: read error dropped: {e}");
                Poll::Idle
            }
        }
    }

    /// Sleep for the idle back-off.
    pub fn back_off(&self) {
        if !self.idle_backoff.is_zero() {
            thread::sleep(self.idle_backoff);
        }
    }

    /// Producer loop: publish every line into `slot` until the channel closes.
    pub fn run(mut self, slot: &LatestEventSlot, sink: &mut impl EventSink) {
        loop {
            match self.poll() {
                Poll::Line(event) => {
                    sink.emit(&AppEvent::LineReceived(event.raw_text.clone()));
                    slot.publish(event);
                }
                Poll::Dropped => {}
                Poll::Idle => self.back_off(),
                Poll::Closed => break,
            }
        }
        trace!("serial: channel closed, producer exiting");
    }
}

/// Start the producer on a detached thread.  The handle is dropped on
/// purpose; shutdown closes the channel instead of joining.
pub fn spawn<S, C, K>(
    source: SerialEventSource<S, C>,
    slot: Arc<LatestEventSlot>,
    mut sink: K,
) -> io::Result<()>
where
    S: LineSource + Send + 'static,
    C: Clock + Send + 'static,
    K: EventSink + Send + 'static,
{
    thread::Builder::new()
        .name("serial-rx".into())
        .spawn(move || source.run(&slot, &mut sink))
        .map(drop)
}
