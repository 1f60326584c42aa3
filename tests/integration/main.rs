//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one deployment against
//! mock adapters.  No serial device, camera or display is required.

mod logger_tests;
mod mock_io;
mod viewer_tests;
