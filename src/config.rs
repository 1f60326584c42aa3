//! System configuration parameters
//!
//! All tunable parameters for the AVSN bridge.
//! Values come from the defaults below, an optional TOML file, and CLI
//! overrides applied by the binary (in that order).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[cfg(windows)]
const DEFAULT_SERIAL_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Serial ---
    /// Serial device name (e.g. `COM3`, `/dev/ttyUSB0`)
    pub serial_port: String,
    /// Line rate in baud
    pub baud_rate: u32,
    /// Per-read timeout on the channel (milliseconds)
    pub read_timeout_ms: u64,
    /// Wait after opening the channel so the board can finish its reset (milliseconds)
    pub settle_delay_ms: u64,
    /// Back-off when no input is pending (milliseconds)
    pub idle_poll_ms: u64,

    // --- Camera ---
    /// MJPEG stream address
    pub camera_url: String,
    /// Connect timeout for the camera stream (milliseconds)
    pub camera_timeout_ms: u64,
    /// Display and snapshot width (pixels)
    pub frame_width: u32,
    /// Display and snapshot height (pixels)
    pub frame_height: u32,

    // --- Alert ---
    /// Case-sensitive substring that marks an alert line in the viewer
    pub alert_keyword: String,
    /// How long the overlay stays up after the latest trigger (seconds)
    pub alert_window_secs: f64,
    /// Overlay text burned into displayed frames and snapshots
    pub overlay_text: String,
    /// Overlay left edge (pixels)
    pub overlay_x: u32,
    /// Overlay text baseline (pixels from the top)
    pub overlay_y: u32,
    /// Integer glyph scale factor
    pub overlay_scale: u32,

    // --- Storage ---
    /// Directory that receives `intruder_*.jpg` snapshots
    pub snapshot_dir: PathBuf,
    /// CSV event log path
    pub log_path: PathBuf,
    /// Optional JPEG mirror of the live feed for the headless display
    pub preview_path: Option<PathBuf>,
    /// Mirror every Nth displayed frame to `preview_path`
    pub preview_every_frames: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Serial
            serial_port: DEFAULT_SERIAL_PORT.to_owned(),
            baud_rate: 115_200,
            read_timeout_ms: 1000,
            settle_delay_ms: 2000,
            idle_poll_ms: 5,

            // Camera
            camera_url: "http://10.0.0.181:81/stream".to_owned(),
            camera_timeout_ms: 5000,
            frame_width: 640,
            frame_height: 480,

            // Alert
            alert_keyword: "TRIGGER".to_owned(),
            alert_window_secs: 3.0,
            overlay_text: "!! INTRUDER DETECTED !!".to_owned(),
            overlay_x: 50,
            overlay_y: 50,
            overlay_scale: 3,

            // Storage
            snapshot_dir: PathBuf::from("."),
            log_path: PathBuf::from("AVSN_Security_Log.csv"),
            preview_path: None,
            preview_every_frames: 15,
        }
    }
}

impl SystemConfig {
    /// Load a TOML config file.  Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| Error::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the deployments cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.serial_port.trim().is_empty() {
            return Err(Error::Config("serial_port must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(Error::Config("baud_rate must be positive"));
        }
        if self.read_timeout_ms == 0 {
            return Err(Error::Config("read_timeout_ms must be positive"));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(Error::Config("frame_width and frame_height must be positive"));
        }
        if !(self.alert_window_secs.is_finite() && self.alert_window_secs > 0.0) {
            return Err(Error::Config("alert_window_secs must be a positive number"));
        }
        if self.alert_keyword.is_empty() {
            return Err(Error::Config("alert_keyword must not be empty"));
        }
        if self.overlay_scale == 0 {
            return Err(Error::Config("overlay_scale must be at least 1"));
        }
        if self.preview_every_frames == 0 {
            return Err(Error::Config("preview_every_frames must be at least 1"));
        }
        Ok(())
    }

    /// Alert window length as a chrono delta (millisecond resolution).
    pub fn alert_window(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds((self.alert_window_secs * 1000.0).round() as i64)
    }
}
