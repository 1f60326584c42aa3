//! Headless display surface.
//!
//! This is not a live window and opens nothing on screen.  Frames are
//! counted and, when a preview path is configured, every Nth frame is
//! written to a JPEG file that an external image viewer can reload.  Key
//! presses arrive on a channel fed by stdin and the Ctrl+C handler.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use image::ImageFormat;
use log::{debug, info};

use crate::app::ports::DisplaySurface;
use crate::error::Error;
use crate::video::Frame;

pub struct HeadlessDisplay {
    keys: Receiver<char>,
    preview: Option<PathBuf>,
    preview_every: u64,
    frames_shown: u64,
    closed: bool,
}

impl HeadlessDisplay {
    pub fn new(keys: Receiver<char>, preview: Option<PathBuf>, preview_every: u32) -> Self {
        Self {
            keys,
            preview,
            preview_every: u64::from(preview_every.max(1)),
            frames_shown: 0,
            closed: false,
        }
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Display("surface closed".into()));
        }
        self.frames_shown += 1;
        if let Some(path) = &self.preview {
            if self.frames_shown % self.preview_every == 1 || self.preview_every == 1 {
                frame
                    .save_with_format(path, ImageFormat::Jpeg)
                    .map_err(|e| Error::Display(format!("{}: {e}", path.display())))?;
            }
        }
        Ok(())
    }

    fn wait_key(&mut self, timeout: Duration) -> Option<char> {
        match self.keys.recv_timeout(timeout) {
            Ok(key) => Some(key),
            Err(RecvTimeoutError::Timeout) => None,
            // Disconnected returns at once; keep the loop cadence.
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(timeout);
                None
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!("Display: closed after {} frames", self.frames_shown);
        }
    }
}

/// Forward the first character of every stdin line as a key press.
///
/// The reader thread is detached; it ends when stdin closes or the receiver
/// is dropped.
pub fn spawn_stdin_keys(keys: Sender<char>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("stdin-keys".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let Some(key) = line.trim().chars().next() else {
                    continue;
                };
                debug!("Display: key '{}'", key);
                if keys.send(key.to_ascii_lowercase()).is_err() {
                    break;
                }
            }
        })
        .map(drop)
}

/// Channel pair for key input.
pub fn key_channel() -> (Sender<char>, Receiver<char>) {
    mpsc::channel()
}
