//! MJPEG-over-HTTP camera adapter (ESP32-CAM style `http://host:81/stream`).
//!
//! ```text
//!  reqwest GET ──▶ camera-rx thread ──▶ JpegFrameDecoder ──▶ sync_channel ──▶ read_frame()
//!                  (blocking body read)   (SOI/EOI scan)      (bounded)
//! ```
//!
//! One `GET` through a blocking `reqwest` client; any non-2xx status is
//! refused.  The body (already de-chunked by the client) is read on a
//! detached thread and every complete JPEG is decoded to RGB.  Frames that
//! fail to decode are skipped, and frames that arrive while the queue is full
//! are dropped.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::app::ports::FrameSource;
use crate::error::{CaptureError, Error};
use crate::video::codec::JpegFrameDecoder;
use crate::video::{Frame, decode_jpeg};

const READ_CHUNK: usize = 16 * 1024;

/// Decoded frames held between the reader thread and the viewer loop.
const FRAME_QUEUE: usize = 2;

/// How long one `read_frame` waits before reporting "no frame yet".
pub const FRAME_WAIT: Duration = Duration::from_millis(100);

/// Parse and check a camera address.  Only plain `http` is served by the
/// camera firmware.
pub fn stream_url(url: &str) -> Result<Url, CaptureError> {
    let bad = || CaptureError::BadAddress(url.to_owned());
    let parsed = Url::parse(url).map_err(|_| bad())?;
    if parsed.scheme() != "http" || parsed.host_str().is_none_or(str::is_empty) {
        return Err(bad());
    }
    Ok(parsed)
}

pub struct MjpegStream {
    frames: Option<Receiver<Frame>>,
    stop: Arc<AtomicBool>,
}

impl MjpegStream {
    /// Connect, check the status and start the reader thread.
    ///
    /// `timeout` bounds connection setup only; the body is an endless stream.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, CaptureError> {
        let url = stream_url(url)?;
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(None::<Duration>)
            .no_proxy()
            .build()
            .map_err(CaptureError::Http)?;

        let response = client
            .get(url.clone())
            .header(ACCEPT, "multipart/x-mixed-replace")
            .send()
            .map_err(CaptureError::Http)?
            .error_for_status()
            .map_err(|e| match e.status() {
                Some(status) => CaptureError::BadResponse(status.to_string()),
                None => CaptureError::Http(e),
            })?;
        info!("Camera: streaming from {url}");

        let (tx, rx) = mpsc::sync_channel(FRAME_QUEUE);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_rx = Arc::clone(&stop);
        thread::Builder::new()
            .name("camera-rx".into())
            .spawn(move || {
                let _client = client;
                pump(response, &tx, &stop_rx);
            })
            .map_err(CaptureError::Io)?;

        Ok(Self {
            frames: Some(rx),
            stop,
        })
    }
}

/// Read `body` until it ends, fails, `stop` is raised or the receiver goes
/// away, pushing every decodable JPEG into `frames`.
pub fn pump(mut body: impl Read, frames: &SyncSender<Frame>, stop: &AtomicBool) {
    let mut decoder = JpegFrameDecoder::new();
    let mut chunk = vec![0; READ_CHUNK];
    while !stop.load(Ordering::Relaxed) {
        let n = match body.read(&mut chunk) {
            Ok(0) => {
                warn!("Camera: stream ended");
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Camera: read failed: {e}");
                return;
            }
        };
        decoder.push(&chunk[..n]);
        while let Some(jpeg) = decoder.next_frame() {
            let Some(frame) = decode_jpeg(&jpeg) else {
                debug!("Camera: skipped undecodable frame ({} bytes)", jpeg.len());
                continue;
            };
            match frames.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!("Camera: viewer behind, frame dropped"),
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl FrameSource for MjpegStream {
    fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        let Some(frames) = &self.frames else {
            return Err(CaptureError::EndOfStream.into());
        };
        match frames.recv_timeout(FRAME_WAIT) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(CaptureError::EndOfStream.into()),
        }
    }

    fn release(&mut self) {
        if self.frames.take().is_some() {
            self.stop.store(true, Ordering::Relaxed);
            debug!("Camera: released");
        }
    }
}

/// Stand-in when the camera is unreachable: never yields a frame.
pub struct NoCamera {
    idle: Duration,
}

impl NoCamera {
    pub fn new(idle: Duration) -> Self {
        Self { idle }
    }
}

impl FrameSource for NoCamera {
    fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        std::thread::sleep(self.idle);
        Ok(None)
    }
}
