//! Unified error types for the AVSN bridge.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! deployment loops' error handling uniform.  Only channel-open failures are
//! fatal; every other variant is reported and the loop carries on.

use core::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The serial channel could not be opened (fatal at startup).
    Channel(ChannelError),
    /// The camera stream failed.
    Capture(CaptureError),
    /// A snapshot image could not be written.
    Snapshot(SnapshotError),
    /// The durable event log could not be created or appended to.
    Log(io::Error),
    /// The display surface rejected a frame.
    Display(String),
    /// A config field failed range validation.
    Config(&'static str),
    /// The config file could not be read or parsed.
    ConfigFile { path: PathBuf, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "channel: {e}"),
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot: {e}"),
            Self::Log(e) => write!(f, "event log: {e}"),
            Self::Display(msg) => write!(f, "display: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::ConfigFile { path, reason } => {
                write!(f, "config file {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Log(e) => Some(e),
            Self::Capture(e) => std::error::Error::source(e),
            Self::Snapshot(SnapshotError { source: Some(e), .. }) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

/// The serial device could not be opened at the configured address and rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelError {
    pub port: String,
    pub reason: String,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not open {}: {}", self.port, self.reason)
    }
}

impl std::error::Error for ChannelError {}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum CaptureError {
    /// The stream address could not be parsed.
    BadAddress(String),
    /// The camera answered with something other than an MJPEG stream.
    BadResponse(String),
    /// The stream ended.
    EndOfStream,
    /// The HTTP request could not be made.
    Http(reqwest::Error),
    /// Local I/O failure (reader thread could not start).
    Io(io::Error),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadAddress(addr) => write!(f, "bad stream address '{addr}'"),
            Self::BadResponse(line) => write!(f, "unexpected response '{line}'"),
            Self::EndOfStream => write!(f, "stream ended"),
            Self::Http(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Snapshot errors
// ---------------------------------------------------------------------------

/// A snapshot write failed.  Carries the target path for the diagnostic.
#[derive(Debug)]
pub struct SnapshotError {
    pub path: PathBuf,
    pub reason: String,
    pub source: Option<io::Error>,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not written: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as _)
    }
}

impl From<SnapshotError> for Error {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
