//! Line transport seam.
//!
//! The session state machine is written against this trait so serial
//! hardware and in-memory test doubles are interchangeable.

use std::io;
use std::time::Duration;

/// Errors surfaced by a line transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No complete line arrived within the allowed window.
    #[error("read timed out")]
    TimedOut,

    /// The peer closed the connection.
    #[error("transport closed by peer")]
    Closed,

    #[error("transport i/o error: {0}")]
    Io(#[from] io::Error),
}

/// A bidirectional, newline-delimited byte channel.
pub trait LineTransport {
    /// Read one line, stripped of its terminator, waiting at most
    /// `timeout` for it to arrive.
    fn read_line(&mut self, timeout: Duration) -> Result<String, TransportError>;

    /// Write one line. The terminator is appended by the transport.
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;
}
