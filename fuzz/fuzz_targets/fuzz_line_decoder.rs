//! Fuzz target: `events::decode_bytes`
//!
//! Arbitrary serial bytes must decode without panicking.  Triggers always
//! carry a finite value and a non-empty reason; malformed input carries no
//! text.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use avsn::event_log::LogRecord;
use avsn::events::{EventKind, decode_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let event = decode_bytes(data, chrono::Local::now());
    match &event.kind {
        EventKind::Trigger {
            reason,
            value,
            value_text,
        } => {
            assert!(value.is_finite());
            assert!(!reason.is_empty());
            let record = LogRecord::from_event(&event).unwrap();
            assert_eq!(&record.sensor_value, value_text);
        }
        EventKind::Debug(text) => assert_eq!(text, &event.raw_text),
        EventKind::Malformed => assert!(event.raw_text.is_empty()),
    }
});
