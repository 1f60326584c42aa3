//! Mock adapters for integration tests.
//!
//! Scripted serial lines and camera frames, a display that records what it
//! was shown, a manually advanced clock, and a sink that keeps every event.
//! Release calls from all three devices go to one shared [`ReleaseLog`] so
//! tests can assert on shutdown order.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use avsn::alert::StateId;
use avsn::app::events::AppEvent;
use avsn::app::ports::{Clock, DisplaySurface, EventSink, FrameSource, LineSource};
use avsn::error::{CaptureError, Error};
use avsn::serial::ChannelCloser;
use avsn::video::Frame;
use chrono::{DateTime, Local, TimeDelta, TimeZone};

/// 2026-10-14 12:00:00 local time.
pub fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

// ── Release order ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ReleaseLog(Arc<Mutex<Vec<&'static str>>>);

impl ReleaseLog {
    pub fn push(&self, what: &'static str) {
        self.0.lock().unwrap().push(what);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

// ── Serial ────────────────────────────────────────────────────

pub struct ScriptedLines(pub VecDeque<Vec<u8>>);

impl ScriptedLines {
    pub fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|l| format!("{l}\r\n").into_bytes()).collect())
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.0.pop_front())
    }
}

pub struct RecordingCloser(pub ReleaseLog);

impl ChannelCloser for RecordingCloser {
    fn close_channel(&self) -> bool {
        self.0.push("channel");
        true
    }
}

// ── Camera ────────────────────────────────────────────────────

pub enum FrameStep {
    Frame,
    Miss,
    Fail,
}

pub struct ScriptedFrames {
    steps: VecDeque<FrameStep>,
    width: u32,
    height: u32,
    released: ReleaseLog,
}

impl ScriptedFrames {
    pub fn new(steps: Vec<FrameStep>, released: ReleaseLog) -> Self {
        Self {
            steps: steps.into(),
            width: 320,
            height: 240,
            released,
        }
    }
}

impl FrameSource for ScriptedFrames {
    fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        match self.steps.pop_front() {
            Some(FrameStep::Frame) => Ok(Some(Frame::new(self.width, self.height))),
            Some(FrameStep::Miss) => Ok(None),
            Some(FrameStep::Fail) | None => Err(CaptureError::EndOfStream.into()),
        }
    }

    fn release(&mut self) {
        self.released.push("video");
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Shown(Arc<Mutex<Vec<Frame>>>);

impl Shown {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Frame> {
        self.0.lock().unwrap().last().cloned()
    }
}

pub struct RecordingDisplay {
    pub shown: Shown,
    keys: VecDeque<char>,
    released: ReleaseLog,
}

impl RecordingDisplay {
    pub fn new(keys: &[char], released: ReleaseLog) -> Self {
        Self {
            shown: Shown::default(),
            keys: keys.iter().copied().collect(),
            released,
        }
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        self.shown.0.lock().unwrap().push(frame.clone());
        Ok(())
    }

    fn wait_key(&mut self, _timeout: Duration) -> Option<char> {
        self.keys.pop_front()
    }

    fn close(&mut self) {
        self.released.push("display");
    }
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Local>>>);

impl ManualClock {
    pub fn at(start: DateTime<Local>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.0.lock().unwrap();
        *now += TimeDelta::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }
}

// ── Sink ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn snapshots_saved(&self) -> usize {
        self.count(|e| matches!(e, AppEvent::SnapshotSaved(_)))
    }

    pub fn transitions(&self) -> Vec<(StateId, StateId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
