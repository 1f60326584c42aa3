//! AVSN sensor bridge library.
//!
//! Exposes the serial core, the alert controller, the snapshot and CSV log
//! writers, and the two deployment services for integration testing.  The
//! binary in `main.rs` only wires adapters to these.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod config;
pub mod error;
pub mod event_log;
pub mod events;
pub mod serial;
pub mod slot;
pub mod snapshot;
pub mod video;
