//! Error types for vector parsing and record formatting.

/// Errors raised while turning a vector-file line into a typed test vector.
///
/// These are per-vector failures: callers skip the offending line and
/// continue with the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VectorError {
    #[error("mandatory field missing: {0}")]
    MissingField(&'static str),

    #[error("field {field} has invalid value: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("field {field} is not a decimal number: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field {field} is not valid hex: {value}")]
    InvalidHex { field: &'static str, value: String },

    #[error("field {field} length of {bits} bits is not byte-aligned")]
    UnalignedLength { field: &'static str, bits: u64 },

    #[error("field {field} is {hex_len} hex chars but declares {bits} bits")]
    LengthMismatch {
        field: &'static str,
        hex_len: usize,
        bits: u64,
    },

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Errors raised while slicing an assembled response into result records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("empty response")]
    EmptyResponse,

    #[error("monte carlo response length {0} is not divisible by 100")]
    NotDivisibleBy100(usize),

    #[error("monte carlo slice of {slice} hex chars too short for layout needing {need}")]
    SliceTooShort { slice: usize, need: usize },

    #[error("response of {actual} hex chars shorter than the {split}-char payload split")]
    ResponseTooShort { actual: usize, split: usize },
}
