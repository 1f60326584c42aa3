//! Integration tests for the logger deployment: serial lines → strict
//! decoder → durable CSV log, across restarts.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use avsn::app::events::{AppEvent, Deployment};
use avsn::app::logger::{LoggerService, LoggerStep};
use avsn::event_log::{CsvEventLog, LogRecord};
use avsn::serial::{SerialEventSource, SharedChannel};

use crate::mock_io::{ManualClock, RecordingSink, ScriptedLines, t0};

fn service(lines: &[&str], log: &Path) -> LoggerService<ScriptedLines, ManualClock> {
    let source = SerialEventSource::new(
        SharedChannel::new(ScriptedLines::new(lines)),
        ManualClock::at(t0()),
        Duration::ZERO,
    );
    LoggerService::new(source, CsvEventLog::new(log))
}

fn row(time: &str, reason: &str, value: &str) -> LogRecord {
    LogRecord {
        date: "2026-10-14".into(),
        time: time.into(),
        event_reason: reason.into(),
        sensor_value: value.into(),
    }
}

#[test]
fn trigger_is_logged_as_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AVSN_Security_Log.csv");
    let mut svc = service(&["TRIGGER,2400"], &path);
    let mut sink = RecordingSink::new();

    svc.start(&mut sink);
    assert_eq!(
        svc.step(&mut sink),
        LoggerStep::Logged(row("12:00:00", "TRIGGER", "2400"))
    );

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "Date,Time,Event,Sensor_Value\r\n2026-10-14,12:00:00,TRIGGER,2400\r\n"
    );
    assert!(sink.events.contains(&AppEvent::RecordLogged(row(
        "12:00:00", "TRIGGER", "2400"
    ))));
}

#[test]
fn debug_line_is_echoed_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut svc = service(&["Debug: camera ok"], &path);
    let mut sink = RecordingSink::new();

    svc.start(&mut sink);
    assert_eq!(svc.step(&mut sink), LoggerStep::Debug);

    assert!(sink.events.contains(&AppEvent::DebugLine("Debug: camera ok".into())));
    assert_eq!(svc.log().count().unwrap(), 0);
}

#[test]
fn keyword_without_strict_fields_is_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut svc = service(&["TRIGGER", "TRIGGER,high", "a,b,c"], &path);
    let mut sink = RecordingSink::new();

    svc.start(&mut sink);
    assert_eq!(svc.drain(&mut sink), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::DebugLine(_))), 3);
}

#[test]
fn rows_survive_restart_in_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = RecordingSink::new();

    let mut first = service(&["TRIGGER,1", "Debug: x", "TRIGGER,2", "TRIGGER,3"], &path);
    first.start(&mut sink);
    assert_eq!(first.drain(&mut sink), 3);
    first.stop(&mut sink);
    drop(first);

    let mut sink = RecordingSink::new();
    let mut second = service(&["DOOR,4"], &path);
    second.start(&mut sink);
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::LogReady {
            path: path.clone(),
            created: false,
            existing: 3,
        })
    );
    assert_eq!(second.drain(&mut sink), 1);

    let rows = CsvEventLog::new(&path).read_all().unwrap();
    let values: Vec<&str> = rows.iter().map(|r| r.sensor_value.as_str()).collect();
    assert_eq!(values, vec!["1", "2", "3", "4"]);
    assert_eq!(rows[3].event_reason, "DOOR");

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("Date,Time,Event,Sensor_Value").count(), 1);
}

#[test]
fn starting_twice_keeps_single_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut sink = RecordingSink::new();

    let mut svc = service(&[], &path);
    svc.start(&mut sink);
    svc.start(&mut sink);

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Date,Time,Event,Sensor_Value\r\n"
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::LogReady { created: true, .. })),
        1
    );
}

#[test]
fn append_failure_is_reported_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("log.csv");
    let mut svc = service(&["TRIGGER,1", "Debug: still here"], &path);
    let mut sink = RecordingSink::new();

    svc.start(&mut sink);
    assert_eq!(svc.step(&mut sink), LoggerStep::WriteFailed);
    assert_eq!(svc.step(&mut sink), LoggerStep::Debug);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::LogWriteFailed(_))),
        2
    );
}

#[test]
fn run_stops_on_interrupt_and_closes_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut svc = service(&["TRIGGER,1"], &path);
    let mut sink = RecordingSink::new();

    svc.start(&mut sink);
    let running = AtomicBool::new(false);
    svc.run(&running, &mut sink);

    assert!(!svc.source().channel().is_open());
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped(Deployment::Logger)));
    assert_eq!(svc.step(&mut sink), LoggerStep::Closed);
    assert_eq!(svc.log().count().unwrap(), 0);
}
