//! Pure data transformation for the CAVP serial host.
//!
//! This crate performs no I/O: it parses vector-file lines into typed
//! test vectors, encodes protocol fields for the line-oriented serial
//! channel, reassembles multi-line responses, and formats the resulting
//! records. The protocol state machine and the transports that feed it
//! live in `cavp-protocol`.

pub mod error;
pub mod framing;
pub mod parser;
pub mod record;
pub mod response;
pub mod vector;

pub use error::{RecordError, VectorError};
pub use parser::parse_line;
pub use record::{format_record, render_capture, RecordBody, ResultRecord};
pub use response::ResponseAssembler;
pub use vector::{AesVector, Algorithm, Direction, ShaVector, TestType, TestVector};
