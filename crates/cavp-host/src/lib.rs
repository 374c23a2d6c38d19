//! Host-side binary support: configuration, logging, the serial
//! transport, and the run loop that ties the vector file, the session,
//! and the result store together.

pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod serial;

pub use config::HostConfig;
pub use error::HostError;
pub use runner::{run, CancelFlag, RunPolicy, RunSummary};
pub use serial::SerialLineTransport;
