//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                  |
//! |----------------|-----------------|------------------------------|
//! | `display`      | DisplaySurface  | Headless preview + stdin keys|
//! | `log_sink`     | EventSink       | Console log output           |
//! | `mjpeg`        | FrameSource     | ESP32-CAM MJPEG over HTTP    |
//! | `serial_port`  | LineSource      | Serial device / recorded file|
//! | `time`         | Clock           | Local system clock           |

pub mod display;
pub mod log_sink;
pub mod mjpeg;
pub mod serial_port;
pub mod time;
