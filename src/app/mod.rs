//! Application core: deployment loops over port traits.
//!
//! Two deployments share the serial core:
//! - [`viewer`]: background serial thread → slot → per-frame alert
//!   controller → snapshots + display.
//! - [`logger`]: single-context serial loop → decoder → durable CSV log.
//!
//! All interaction with devices happens through **port traits** defined in
//! [`ports`], keeping this layer testable without real hardware.

pub mod events;
pub mod logger;
pub mod ports;
pub mod viewer;
