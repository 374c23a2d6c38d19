//! Lockstep handshake session.
//!
//! One session spans one serial connection: startup announcement,
//! greeting, any number of vector exchanges, shutdown. Every field sent
//! to the target blocks on its specific ack token; an ack that never
//! arrives is retried by resending the whole step, then escalated to a
//! session-fatal timeout. Lines that are not the awaited token are
//! discarded, so target-side debug chatter cannot wedge the exchange.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use cavp_core::framing::{
    chunk_hex, fixed_width_decimal, sanitize_line, AAD_LEN_WIDTH, HEX_CHUNK_CHARS,
    INPUT_LEN_WIDTH, IV_LEN_WIDTH, SHA_INPUT_LEN_WIDTH, TAG_LEN_WIDTH,
};
use cavp_core::response::{Ingest, ResponseAssembler};
use cavp_core::vector::{AesVector, Direction, ShaVector, TestVector};

use crate::constants::*;
use crate::error::SessionError;
use crate::transport::{LineTransport, TransportError};

/// Timing and retry budget for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait for `target-ready` after opening the channel.
    pub startup_timeout: Duration,
    /// Per-ack wait before a step is resent.
    pub ack_timeout: Duration,
    /// Wait for the full response stream of one vector.
    pub response_timeout: Duration,
    /// Resends of a step before its timeout becomes session-fatal.
    pub step_retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            startup_timeout: Duration::from_secs(30),
            ack_timeout: Duration::from_secs(2),
            response_timeout: Duration::from_secs(120),
            step_retries: 3,
        }
    }
}

/// Where the session currently is in the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingTargetReady,
    AwaitingAck(&'static str),
    AwaitingResponse,
    Idle,
    Done,
}

/// Drives the lockstep exchange over any [`LineTransport`].
pub struct HandshakeSession<T> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl<T: LineTransport> HandshakeSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::AwaitingTargetReady,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wait for the target's readiness announcement, then greet it.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let startup = self.config.startup_timeout;
        match self.await_token(TARGET_READY, startup) {
            Ok(()) => {}
            Err(TransportError::TimedOut) => return Err(SessionError::TargetUnresponsive),
            Err(e) => return Err(e.into()),
        }
        debug!("target ready, greeting");
        self.step(TARGET_ACK, |t| t.write_line(GREETING))?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Execute one full vector exchange and return the assembled
    /// response as uppercase hex.
    pub fn run_vector(&mut self, vector: &TestVector) -> Result<String, SessionError> {
        debug!(test_id = vector.test_id(), "starting vector exchange");
        self.step(START_ACK, |t| t.write_line(LOOP_START))?;
        match vector {
            TestVector::Aes(v) => self.send_aes(v)?,
            TestVector::Sha(v) => self.send_sha(v)?,
        }
        self.await_response()
    }

    /// Notify the target that no more vectors follow. The shutdown
    /// token is not acknowledged.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        self.transport.write_line(SESSION_END)?;
        self.state = SessionState::Done;
        Ok(())
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn send_aes(&mut self, v: &AesVector) -> Result<(), SessionError> {
        self.send_field("aes", ALGO_ACK)?;
        self.send_field(v.test_type.as_str(), TYPE_ACK)?;
        self.send_field(v.mode.as_str(), MODE_ACK)?;
        self.send_field(&v.key_len_bits.to_string(), KEYLEN_ACK)?;
        self.send_field(v.direction.as_str(), OP_ACK)?;
        self.send_payload(&v.key, KEY_ACK)?;

        if let Some(bits) = v.iv_len_bits {
            self.send_field(&fixed_width_decimal(bits, IV_LEN_WIDTH), IVLEN_ACK)?;
        }
        if let Some(iv) = &v.iv {
            self.send_payload(iv, IV_ACK)?;
        }
        if let Some(bits) = v.aad_len_bits {
            self.send_field(&fixed_width_decimal(bits, AAD_LEN_WIDTH), AADLEN_ACK)?;
        }
        if let Some(aad) = &v.aad {
            self.send_payload(aad, AAD_ACK)?;
        }
        if let Some(bits) = v.tag_len_bits {
            self.send_field(&fixed_width_decimal(bits, TAG_LEN_WIDTH), TAGLEN_ACK)?;
        }
        // The tag travels host-to-target only when the target must
        // verify it.
        if v.direction == Direction::Decrypt {
            if let Some(tag) = &v.tag {
                self.send_payload(tag, TAG_ACK)?;
            }
        }

        self.send_field(
            &fixed_width_decimal(v.input_len_bytes() as u64, INPUT_LEN_WIDTH),
            INPUTLEN_ACK,
        )?;
        self.send_payload(&v.input, INPUT_ACK)
    }

    fn send_sha(&mut self, v: &ShaVector) -> Result<(), SessionError> {
        self.send_field("sha", ALGO_ACK)?;
        self.send_field(v.test_type.as_str(), TYPE_ACK)?;
        self.send_field(&v.mode, MODE_ACK)?;
        self.send_field(
            &fixed_width_decimal(v.input_len_bits, SHA_INPUT_LEN_WIDTH),
            INPUTLEN_ACK,
        )?;
        self.send_payload(&v.input, INPUT_ACK)
    }

    fn send_field(&mut self, value: &str, ack: &'static str) -> Result<(), SessionError> {
        trace!(value, ack, "sending field");
        self.step(ack, |t| t.write_line(value))
    }

    fn send_payload(&mut self, hex: &str, ack: &'static str) -> Result<(), SessionError> {
        // An empty payload produces no lines, but the target still acks.
        self.step(ack, |t| {
            for chunk in chunk_hex(hex, HEX_CHUNK_CHARS) {
                t.write_line(chunk)?;
            }
            Ok(())
        })
    }

    /// Send one step and wait for its ack, resending the whole step on
    /// timeout until the retry budget runs out.
    fn step<F>(&mut self, awaiting: &'static str, send: F) -> Result<(), SessionError>
    where
        F: Fn(&mut T) -> Result<(), TransportError>,
    {
        let ack_timeout = self.config.ack_timeout;
        let attempts = self.config.step_retries + 1;
        self.state = SessionState::AwaitingAck(awaiting);
        for attempt in 1..=attempts {
            send(&mut self.transport)?;
            match self.await_token(awaiting, ack_timeout) {
                Ok(()) => return Ok(()),
                Err(TransportError::TimedOut) => {
                    warn!(awaiting, attempt, "ack timed out, resending step");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(SessionError::Timeout { awaiting, attempts })
    }

    /// Read until the exact token arrives or the deadline passes.
    /// Unrelated lines are discarded.
    fn await_token(
        &mut self,
        token: &'static str,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(TransportError::TimedOut)?;
            let raw = self.transport.read_line(remaining)?;
            let line = sanitize_line(&raw);
            if line == token {
                return Ok(());
            }
            debug!(line, expected = token, "discarding unrelated line");
        }
    }

    fn await_response(&mut self) -> Result<String, SessionError> {
        self.state = SessionState::AwaitingResponse;
        let mut assembler = ResponseAssembler::new();
        let deadline = Instant::now() + self.config.response_timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(SessionError::Timeout {
                    awaiting: "response",
                    attempts: 1,
                })?;
            let raw = match self.transport.read_line(remaining) {
                Ok(raw) => raw,
                Err(TransportError::TimedOut) => {
                    return Err(SessionError::Timeout {
                        awaiting: "response",
                        attempts: 1,
                    })
                }
                Err(e) => return Err(e.into()),
            };
            let line = sanitize_line(&raw);
            match assembler.ingest(line) {
                Ingest::Complete => break,
                Ingest::Fragment => {}
                Ingest::Ignored => debug!(line, "discarding line before response"),
            }
        }
        self.state = SessionState::Idle;
        Ok(assembler.finish())
    }
}
