//! Integration tests for the viewer deployment: slot → controller →
//! snapshot + overlay + display, and the shutdown release order.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use avsn::alert::StateId;
use avsn::app::events::{AppEvent, Deployment};
use avsn::app::viewer::{CycleOutcome, Viewer};
use avsn::config::SystemConfig;
use avsn::events::decode;
use avsn::serial::{self, SerialEventSource, SharedChannel};
use avsn::slot::LatestEventSlot;
use avsn::video::overlay::ALERT_RED;
use chrono::TimeDelta;

use crate::mock_io::{
    FrameStep, ManualClock, RecordingCloser, RecordingDisplay, RecordingSink, ReleaseLog,
    ScriptedFrames, ScriptedLines, Shown, t0,
};

type TestViewer = Viewer<ScriptedFrames, RecordingDisplay, ManualClock, RecordingCloser>;

struct Rig {
    viewer: TestViewer,
    slot: Arc<LatestEventSlot>,
    clock: ManualClock,
    shown: Shown,
    released: ReleaseLog,
    sink: RecordingSink,
}

fn config(dir: &Path) -> SystemConfig {
    SystemConfig {
        snapshot_dir: dir.to_path_buf(),
        frame_width: 160,
        frame_height: 120,
        ..SystemConfig::default()
    }
}

fn rig(dir: &Path, steps: Vec<FrameStep>, keys: &[char]) -> Rig {
    let released = ReleaseLog::default();
    let slot = Arc::new(LatestEventSlot::new());
    let clock = ManualClock::at(t0());
    let display = RecordingDisplay::new(keys, released.clone());
    let shown = display.shown.clone();
    let viewer = Viewer::new(
        &config(dir),
        ScriptedFrames::new(steps, released.clone()),
        display,
        clock.clone(),
        Arc::clone(&slot),
        RecordingCloser(released.clone()),
    );
    Rig {
        viewer,
        slot,
        clock,
        shown,
        released,
        sink: RecordingSink::new(),
    }
}

fn snapshot_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("intruder_"))
        .collect();
    names.sort();
    names
}

fn has_overlay(shown: &Shown) -> bool {
    shown
        .last()
        .map(|f| f.pixels().any(|p| *p == ALERT_RED))
        .unwrap_or(false)
}

fn frames(n: usize) -> Vec<FrameStep> {
    (0..n).map(|_| FrameStep::Frame).collect()
}

// ── Trigger → one snapshot, overlay on ───────────────────────

#[test]
fn trigger_produces_one_named_snapshot_and_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(2), &[]);

    r.slot.publish(decode("TRIGGER,2400", t0()));
    assert_eq!(r.viewer.run_cycle(&mut r.sink), CycleOutcome::Continue);

    assert_eq!(snapshot_files(dir.path()), vec!["intruder_20261014_120000.jpg"]);
    let saved = r
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::SnapshotSaved(p) => Some(p.clone()),
            _ => None,
        })
        .expect("snapshot reported");
    assert!(saved.is_absolute());
    assert!(saved.ends_with("intruder_20261014_120000.jpg"));

    assert_eq!(r.viewer.controller().state(), StateId::Alerting);
    assert_eq!(r.sink.transitions(), vec![(StateId::Idle, StateId::Alerting)]);
    assert_eq!(r.shown.last().unwrap().dimensions(), (160, 120));
    assert!(has_overlay(&r.shown));
}

#[test]
fn consumed_trigger_never_fires_twice() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(4), &[]);

    r.slot.publish(decode("TRIGGER,2400", t0()));
    for _ in 0..4 {
        r.viewer.run_cycle(&mut r.sink);
        r.clock.advance_ms(100);
    }

    assert_eq!(r.sink.snapshots_saved(), 1);
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::AlertRaised { .. })),
        1
    );
    assert_eq!(snapshot_files(dir.path()).len(), 1);
}

#[test]
fn second_trigger_within_window_extends_and_snapshots_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(5), &[]);

    r.slot.publish(decode("TRIGGER,2400", t0()));
    r.viewer.run_cycle(&mut r.sink);

    r.clock.advance_ms(1_000);
    r.slot.publish(decode("TRIGGER,2510", t0() + TimeDelta::seconds(1)));
    r.viewer.run_cycle(&mut r.sink);

    assert_eq!(
        snapshot_files(dir.path()),
        vec!["intruder_20261014_120000.jpg", "intruder_20261014_120001.jpg"]
    );
    let extended: Vec<bool> = r
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AlertRaised { extended, .. } => Some(*extended),
            _ => None,
        })
        .collect();
    assert_eq!(extended, vec![false, true]);
    assert_eq!(
        r.viewer.controller().active_until(),
        Some(t0() + TimeDelta::seconds(4))
    );

    // Past the first window, still inside the extended one.
    r.clock.advance_ms(2_500);
    r.viewer.run_cycle(&mut r.sink);
    assert_eq!(r.viewer.controller().state(), StateId::Alerting);
    assert!(has_overlay(&r.shown));

    r.clock.advance_ms(600);
    r.viewer.run_cycle(&mut r.sink);
    assert_eq!(r.viewer.controller().state(), StateId::Idle);
    assert!(!has_overlay(&r.shown));
    assert_eq!(
        r.sink.transitions(),
        vec![
            (StateId::Idle, StateId::Alerting),
            (StateId::Alerting, StateId::Idle)
        ]
    );
}

#[test]
fn debug_line_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(1), &[]);

    r.slot.publish(decode("Debug: camera ok", t0()));
    r.viewer.run_cycle(&mut r.sink);

    assert!(snapshot_files(dir.path()).is_empty());
    assert_eq!(r.viewer.controller().state(), StateId::Idle);
    assert!(!has_overlay(&r.shown));
    assert!(!r.slot.is_pending());
}

#[test]
fn keyword_anywhere_in_line_fires_viewer() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(1), &[]);

    r.slot.publish(decode("PIR TRIGGERED zone 2", t0()));
    r.viewer.run_cycle(&mut r.sink);

    assert_eq!(r.sink.snapshots_saved(), 1);
}

#[test]
fn missed_frame_leaves_slot_for_next_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(
        dir.path(),
        vec![FrameStep::Miss, FrameStep::Frame],
        &[],
    );

    r.slot.publish(decode("TRIGGER,2400", t0()));
    r.viewer.run_cycle(&mut r.sink);
    assert!(r.slot.is_pending());
    assert_eq!(r.shown.count(), 0);
    assert_eq!(r.sink.snapshots_saved(), 0);

    r.viewer.run_cycle(&mut r.sink);
    assert!(!r.slot.is_pending());
    assert_eq!(r.sink.snapshots_saved(), 1);
}

#[test]
fn window_expires_on_missed_frames_too() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), vec![FrameStep::Frame, FrameStep::Miss], &[]);

    r.slot.publish(decode("TRIGGER,1", t0()));
    r.viewer.run_cycle(&mut r.sink);
    r.clock.advance_ms(3_000);
    r.viewer.run_cycle(&mut r.sink);

    assert_eq!(r.viewer.controller().state(), StateId::Idle);
}

#[test]
fn snapshot_failure_is_reported_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir");
    let mut r = rig(&missing, frames(2), &[]);

    r.slot.publish(decode("TRIGGER,2400", t0()));
    assert_eq!(r.viewer.run_cycle(&mut r.sink), CycleOutcome::Continue);

    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::SnapshotFailed(_))),
        1
    );
    assert_eq!(r.viewer.controller().state(), StateId::Alerting);
    assert_eq!(r.shown.count(), 1);
    assert_eq!(r.viewer.run_cycle(&mut r.sink), CycleOutcome::Continue);
}

// ── Loop exit and release order ──────────────────────────────

#[test]
fn quit_key_ends_run_and_releases_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(10), &['x', 'q']);

    r.viewer.run(&mut r.sink);

    assert_eq!(r.shown.count(), 2);
    assert_eq!(r.released.entries(), vec!["video", "display", "channel"]);
    assert_eq!(r.sink.events.first(), Some(&AppEvent::Started(Deployment::Viewer)));
    assert_eq!(r.sink.events.last(), Some(&AppEvent::Stopped(Deployment::Viewer)));
}

#[test]
fn capture_failure_ends_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), vec![FrameStep::Frame, FrameStep::Fail], &[]);

    assert_eq!(r.viewer.run_cycle(&mut r.sink), CycleOutcome::Continue);
    assert_eq!(r.viewer.run_cycle(&mut r.sink), CycleOutcome::Quit);
}

#[test]
fn drop_without_run_still_releases_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(1), &[]);
    r.viewer.shutdown();
    let released = r.released.clone();
    drop(r);

    assert_eq!(released.entries(), vec!["video", "display", "channel"]);
}

// ── End to end with the serial thread ────────────────────────

#[test]
fn serial_thread_feeds_viewer_through_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = rig(dir.path(), frames(1), &[]);

    let channel = SharedChannel::new(ScriptedLines::new(&["TRIGGER,2400"]));
    let source = SerialEventSource::new(channel.clone(), r.clock.clone(), Duration::from_millis(1));
    serial::spawn(source, Arc::clone(&r.slot), RecordingSink::new()).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !r.slot.is_pending() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    r.viewer.run_cycle(&mut r.sink);
    assert_eq!(r.sink.snapshots_saved(), 1);
    assert!(channel.close());
}
