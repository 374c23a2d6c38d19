//! Test doubles for exercising the session without hardware.

use std::collections::VecDeque;
use std::time::Duration;

use crate::transport::{LineTransport, TransportError};

/// In-memory transport fed with a scripted sequence of target lines.
///
/// Every line written by the session is recorded; reads pop the script
/// front and time out once it is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    incoming: VecDeque<String>,
    sent: Vec<String>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            incoming: script.into_iter().map(Into::into).collect(),
            sent: Vec::new(),
        }
    }

    /// Queue more target lines after construction.
    pub fn push_incoming(&mut self, line: impl Into<String>) {
        self.incoming.push_back(line.into());
    }

    /// Everything the session wrote, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl LineTransport for ScriptedTransport {
    fn read_line(&mut self, _timeout: Duration) -> Result<String, TransportError> {
        self.incoming.pop_front().ok_or(TransportError::TimedOut)
    }

    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.sent.push(line.to_string());
        Ok(())
    }
}
