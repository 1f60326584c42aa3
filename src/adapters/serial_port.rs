//! Serial line adapters.
//!
//! - [`SerialPortLines`]: a real device through the `serialport` crate.
//! - [`ReaderLines`]: any `BufRead` (recorded captures, pipes, tests).
//!
//! Both implement [`LineSource`]: they report "nothing pending" instead of
//! blocking when no input is available.

use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use log::info;
use serialport::SerialPort;

use crate::app::ports::LineSource;
use crate::error::ChannelError;

/// Serial device opened at a fixed port name and baud rate.
pub struct SerialPortLines {
    reader: BufReader<Box<dyn SerialPort>>,
    name: String,
}

impl SerialPortLines {
    /// Open `name` at `baud`.  This is the one fatal startup failure.
    pub fn open(name: &str, baud: u32, read_timeout: Duration) -> Result<Self, ChannelError> {
        let port = serialport::new(name, baud)
            .timeout(read_timeout)
            .open()
            .map_err(|e| ChannelError {
                port: name.to_owned(),
                reason: e.to_string(),
            })?;
        info!("Serial: opened {} @ {} baud", name, baud);
        Ok(Self {
            reader: BufReader::new(port),
            name: name.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn input_pending(&self) -> io::Result<bool> {
        if !self.reader.buffer().is_empty() {
            return Ok(true);
        }
        let waiting = self
            .reader
            .get_ref()
            .bytes_to_read()
            .map_err(io::Error::other)?;
        Ok(waiting > 0)
    }
}

impl LineSource for SerialPortLines {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        if !self.input_pending()? {
            return Ok(None);
        }
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            // Timed out mid-line: hand over what arrived, like a readline with timeout.
            Err(e) if e.kind() == io::ErrorKind::TimedOut && !line.is_empty() => Ok(Some(line)),
            Err(e) => Err(e),
        }
    }
}

/// Lines from any buffered reader.  End of input reads as "nothing pending".
pub struct ReaderLines<R> {
    reader: R,
    exhausted: bool,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }

    /// `true` once the reader hit end of input.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        Ok(Some(line))
    }
}
