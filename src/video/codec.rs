//! Streaming JPEG frame extractor for MJPEG streams.
//!
//! Wire format (multipart body, boundaries and part headers ignored):
//! ```text
//! ┌───────────┬──────────────┬────────┬───────────┬──────────────┬────────┐
//! │ headers…  │ FF D8 … data │ FF D9  │ headers…  │ FF D8 … data │ FF D9  │
//! └───────────┴──────────────┴────────┴───────────┴──────────────┴────────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete JPEG images
//! (SOI through EOI inclusive).  A single socket read may carry part of a
//! frame, exactly one frame, or several concatenated frames.

/// Largest frame accepted before the buffer is discarded.
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Streaming JPEG decoder.
#[derive(Default)]
pub struct JpegFrameDecoder {
    buf: Vec<u8>,
}

impl JpegFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the decoder.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        if self.buf.len() > MAX_FRAME_SIZE {
            // Runaway frame (missing EOI): drop it and resync on the next SOI.
            self.buf.clear();
        }
    }

    /// Pop the next complete JPEG, if one is buffered.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let Some(start) = find(&self.buf, &SOI) else {
            // Keep a trailing 0xFF: it may be the first half of an SOI.
            let keep = usize::from(self.buf.last() == Some(&0xFF));
            let drop_to = self.buf.len() - keep;
            self.buf.drain(..drop_to);
            return None;
        };
        if start > 0 {
            self.buf.drain(..start);
        }

        let end = find(&self.buf[SOI.len()..], &EOI)? + SOI.len() + EOI.len();
        let frame: Vec<u8> = self.buf.drain(..end).collect();
        Some(frame)
    }

    /// Bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Reset decoder state (e.g. after a reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

fn find(haystack: &[u8], needle: &[u8; 2]) -> Option<usize> {
    haystack.windows(2).position(|w| w == needle)
}
