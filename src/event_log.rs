//! Durable CSV event log.
//!
//! ```text
//! Date,Time,Event,Sensor_Value        ← written once, at exclusive creation
//! 2026-10-14,12:00:00,TRIGGER,2400    ← one independent append per trigger
//! 2026-10-14,12:00:04,TRIGGER,2510
//! ```
//!
//! The file is never rewritten.  Each record is opened, written in a single
//! buffered flush, synced, then closed, so a crash loses at most the record in
//! flight.  Rows use CRLF endings and RFC 4180 quoting via the `csv` crate.
//! The sensor value column carries the field exactly as the device sent it.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::events::{Event, EventKind};

/// Fixed header, in column order.
pub const HEADER: [&str; 4] = ["Date", "Time", "Event", "Sensor_Value"];

/// One row of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub date: String,
    pub time: String,
    pub event_reason: String,
    pub sensor_value: String,
}

impl LogRecord {
    /// Build a row from a strict trigger.  `None` for debug / malformed lines.
    pub fn from_event(event: &Event) -> Option<Self> {
        let EventKind::Trigger {
            reason, value_text, ..
        } = &event.kind
        else {
            return None;
        };
        Some(Self {
            date: event.received_at.format("%Y-%m-%d").to_string(),
            time: event.received_at.format("%H:%M:%S").to_string(),
            event_reason: reason.clone(),
            sensor_value: value_text.clone(),
        })
    }

    fn fields(&self) -> [&str; 4] {
        [
            &self.date,
            &self.time,
            &self.event_reason,
            &self.sensor_value,
        ]
    }
}

/// Result of [`CsvEventLog::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The header was written: the file was new, or existed but was empty.
    Created,
    /// The file already had content and was left untouched.
    AlreadyExists,
}

pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exclusive-create the log and write the header.
    ///
    /// An existing file is the normal "already initialized" case and is
    /// reported as [`InitOutcome::AlreadyExists`], not as an error.  An
    /// existing zero-length file gets the header appended.
    pub fn initialize(&self) -> io::Result<InitOutcome> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => {
                write_row(file, &HEADER)?;
                Ok(InitOutcome::Created)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if fs::metadata(&self.path)?.len() > 0 {
                    return Ok(InitOutcome::AlreadyExists);
                }
                write_row(OpenOptions::new().append(true).open(&self.path)?, &HEADER)?;
                Ok(InitOutcome::Created)
            }
            Err(e) => Err(e),
        }
    }

    /// Append one record as an independent, synced write.
    ///
    /// If the file vanished or was emptied since startup the header is
    /// written first, so it always precedes the data.
    pub fn append(&self, record: &LogRecord) -> io::Result<()> {
        let file = match OpenOptions::new().append(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.initialize()?;
                OpenOptions::new().append(true).open(&self.path)?
            }
            Err(e) => return Err(e),
        };
        if file.metadata()?.len() == 0 {
            write_row(file.try_clone()?, &HEADER)?;
        }
        write_row(file, &record.fields())
    }

    /// Read every data row back.  A leading header row is skipped; rows
    /// without exactly four fields are ignored.
    pub fn read_all(&self) -> io::Result<Vec<LogRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row?;
            if i == 0 && row.iter().eq(HEADER) {
                continue;
            }
            if let [date, time, reason, value] = row.iter().collect::<Vec<_>>().as_slice() {
                records.push(LogRecord {
                    date: (*date).to_owned(),
                    time: (*time).to_owned(),
                    event_reason: (*reason).to_owned(),
                    sensor_value: (*value).to_owned(),
                });
            }
        }
        Ok(records)
    }

    /// Number of data rows currently in the file.
    pub fn count(&self) -> io::Result<usize> {
        self.read_all().map(|r| r.len())
    }
}

/// Write one CRLF-terminated row, flush it in one go and sync it to disk.
fn write_row(file: File, fields: &[&str]) -> io::Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(file);
    writer.write_record(fields)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_data()
}
