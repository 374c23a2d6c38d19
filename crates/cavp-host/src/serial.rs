//! Serial implementation of the line transport.
//!
//! The port is opened with a short poll timeout so reads can honor the
//! caller's deadline instead of blocking indefinitely. Incoming bytes
//! accumulate in a buffer until a newline completes a line.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use tracing::debug;

use cavp_protocol::{LineTransport, TransportError};

/// How often a blocked read wakes up to check the deadline.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Newline-delimited transport over a serial port.
pub struct SerialLineTransport {
    port: Box<dyn serialport::SerialPort>,
    pending: Vec<u8>,
}

impl SerialLineTransport {
    /// Open the named port at the given baud rate, 8N1.
    pub fn open(path: &str, baud: u32) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud)
            .timeout(POLL_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        debug!(path, baud, "serial port opened");
        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }

    /// Pop one complete line from the pending buffer, terminator
    /// stripped.
    fn take_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop();
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

impl LineTransport for SerialLineTransport {
    fn read_line(&mut self, timeout: Duration) -> Result<String, TransportError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }
            if Instant::now() >= deadline {
                return Err(TransportError::TimedOut);
            }
            let mut buf = [0u8; 256];
            match self.port.read(&mut buf) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }
}
