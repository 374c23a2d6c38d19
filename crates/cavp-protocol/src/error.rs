//! Error types for the protocol engine.

use crate::transport::TransportError;

/// Session-fatal protocol failures. Once one of these is raised the
/// target's state is unknown and the session cannot continue.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The target never announced itself after reset.
    #[error("target did not announce readiness")]
    TargetUnresponsive,

    /// An expected ack never arrived, even after resending.
    #[error("timed out awaiting {awaiting} after {attempts} attempts")]
    Timeout {
        awaiting: &'static str,
        attempts: u32,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result-store persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("result store i/o error: {0}")]
    Io(#[from] std::io::Error),
}
