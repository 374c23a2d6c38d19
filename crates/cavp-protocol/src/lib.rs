//! Handshake protocol engine for the CAVP serial host.
//!
//! The target speaks a strict lockstep dialect: every field the host
//! sends is answered by a field-specific ack token before the next one
//! may go out. [`HandshakeSession`] drives that exchange over any
//! [`LineTransport`], and [`ResultStore`] persists the per-test outcome
//! markers that make interrupted runs resumable.

pub mod constants;
pub mod error;
pub mod session;
pub mod store;
pub mod testing;
pub mod transport;

pub use error::{SessionError, StoreError};
pub use session::{HandshakeSession, SessionConfig, SessionState};
pub use store::{completion_marker, failure_marker, ResultStore};
pub use transport::{LineTransport, TransportError};
