//! Serial events and the line decoder.
//!
//! The device speaks a newline-delimited text protocol:
//!
//! ```text
//!   TRIGGER,2400        ──▶ Trigger { reason: "TRIGGER", value: 2400 }
//!   Debug: camera ok    ──▶ Debug("Debug: camera ok")
//!   <non-UTF-8 / empty> ──▶ Malformed (dropped by the source)
//! ```
//!
//! Decoding never fails.  An unparseable numeric field demotes the line to
//! `Debug`, never to `Malformed`.

use chrono::{DateTime, Local};

/// Field separator of the two-field trigger format.
pub const FIELD_SEPARATOR: char = ',';

/// What a decoded line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Strict two-field `<reason>,<number>` line.  `value_text` is the
    /// trimmed field exactly as sent; `value` is its parsed reading.
    Trigger {
        reason: String,
        value: f64,
        value_text: String,
    },
    /// Any other non-empty text.
    Debug(String),
    /// Bytes that are not UTF-8, or an empty line.
    Malformed,
}

/// An immutable decoded serial event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// The line as received, trailing whitespace stripped.
    pub raw_text: String,
    pub received_at: DateTime<Local>,
}

impl Event {
    /// Trigger category, if this is a strict trigger.
    pub fn reason(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Trigger { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Sensor reading, if this is a strict trigger.
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            EventKind::Trigger { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Sensor reading as the device wrote it, if this is a strict trigger.
    pub fn value_text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Trigger { value_text, .. } => Some(value_text),
            _ => None,
        }
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, EventKind::Trigger { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, EventKind::Malformed)
    }

    /// Viewer-side recognition: the raw text contains `keyword`, whatever
    /// its field structure.  Case-sensitive.
    pub fn mentions(&self, keyword: &str) -> bool {
        !keyword.is_empty() && self.raw_text.contains(keyword)
    }
}

/// Decode one text line.
pub fn decode(line: &str, received_at: DateTime<Local>) -> Event {
    let raw_text = line.trim_end().to_owned();
    let kind = if raw_text.is_empty() {
        EventKind::Malformed
    } else {
        match split_fields(&raw_text) {
            Some((reason, value)) => match value.parse::<f64>() {
                Ok(v) if v.is_finite() => EventKind::Trigger {
                    reason: reason.to_owned(),
                    value: v,
                    value_text: value.to_owned(),
                },
                _ => EventKind::Debug(raw_text.clone()),
            },
            None => EventKind::Debug(raw_text.clone()),
        }
    };
    Event {
        kind,
        raw_text,
        received_at,
    }
}

/// Decode raw bytes off the wire.  Non-UTF-8 input is `Malformed`.
pub fn decode_bytes(bytes: &[u8], received_at: DateTime<Local>) -> Event {
    match core::str::from_utf8(bytes) {
        Ok(line) => decode(line, received_at),
        Err(_) => Event {
            kind: EventKind::Malformed,
            raw_text: String::new(),
            received_at,
        },
    }
}

/// Exactly two non-empty, whitespace-trimmed fields.
fn split_fields(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(FIELD_SEPARATOR);
    let reason = parts.next()?.trim();
    let value = parts.next()?.trim();
    if parts.next().is_some() || reason.is_empty() || value.is_empty() {
        return None;
    }
    Some((reason, value))
}
