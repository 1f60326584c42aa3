//! Fuzz target: `JpegFrameDecoder`
//!
//! Feeds arbitrary stream bytes in two pieces and checks every yielded
//! frame is bracketed by SOI and EOI and the buffer stays bounded.
//!
//! cargo fuzz run fuzz_jpeg_scanner

#![no_main]

use avsn::video::codec::{JpegFrameDecoder, MAX_FRAME_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.first().map_or(0, |b| usize::from(*b)).min(data.len());
    let mut decoder = JpegFrameDecoder::new();
    for piece in [&data[..split], &data[split..]] {
        decoder.push(piece);
        while let Some(frame) = decoder.next_frame() {
            assert!(frame.len() >= 4);
            assert_eq!(&frame[..2], &[0xFF, 0xD8]);
            assert_eq!(&frame[frame.len() - 2..], &[0xFF, 0xD9]);
        }
        assert!(decoder.buffered() <= MAX_FRAME_SIZE);
    }

    decoder.reset();
    assert_eq!(decoder.buffered(), 0);
});
