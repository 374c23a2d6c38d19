//! Typed test-vector model.
//!
//! Every field that the vector file may omit is an `Option`; absence is a
//! first-class state, never an empty-string sentinel. Lengths are stored
//! in bits exactly as they appear in the file and validated byte-aligned
//! at parse time, so the byte-count accessors here cannot fail.

use std::fmt;

/// Algorithm family of a test vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Aes,
    Sha,
}

impl Algorithm {
    /// Wire token sent as the algorithm field.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Aes => "aes",
            Algorithm::Sha => "sha",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CAVP test type. CTR vectors are framed exactly like AFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    Aft,
    Ctr,
    Mct,
}

impl TestType {
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Aft => "aft",
            TestType::Ctr => "ctr",
            TestType::Mct => "mct",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "aft" => Some(TestType::Aft),
            "ctr" => Some(TestType::Ctr),
            "mct" => Some(TestType::Mct),
            _ => None,
        }
    }
}

/// Cipher operation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Encrypt => "encrypt",
            Direction::Decrypt => "decrypt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "encrypt" => Some(Direction::Encrypt),
            "decrypt" => Some(Direction::Decrypt),
            _ => None,
        }
    }
}

/// AES mode of operation. The mode travels verbatim on the wire, so
/// unrecognized modes are carried through rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AesMode {
    Ecb,
    Cbc,
    Cfb,
    Ofb,
    Ctr,
    Gcm,
    Ccm,
    Other(String),
}

impl AesMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "ecb" => AesMode::Ecb,
            "cbc" => AesMode::Cbc,
            "cfb" => AesMode::Cfb,
            "ofb" => AesMode::Ofb,
            "ctr" => AesMode::Ctr,
            "gcm" => AesMode::Gcm,
            "ccm" => AesMode::Ccm,
            other => AesMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AesMode::Ecb => "ecb",
            AesMode::Cbc => "cbc",
            AesMode::Cfb => "cfb",
            AesMode::Ofb => "ofb",
            AesMode::Ctr => "ctr",
            AesMode::Gcm => "gcm",
            AesMode::Ccm => "ccm",
            AesMode::Other(s) => s,
        }
    }

    pub fn is_ecb(&self) -> bool {
        matches!(self, AesMode::Ecb)
    }
}

/// An AES-family test vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesVector {
    pub test_id: String,
    pub test_type: TestType,
    pub mode: AesMode,
    pub key_len_bits: u32,
    pub key: String,
    pub direction: Direction,
    pub iv: Option<String>,
    pub iv_len_bits: Option<u64>,
    pub aad: Option<String>,
    pub aad_len_bits: Option<u64>,
    pub tag: Option<String>,
    pub tag_len_bits: Option<u64>,
    pub input: String,
    pub input_len_bits: Option<u64>,
    /// Expected response, present in verify-mode vector files.
    pub expected: Option<String>,
}

impl AesVector {
    /// Key length in bytes. Byte alignment is checked at parse time.
    pub fn key_len_bytes(&self) -> usize {
        (self.key_len_bits / 8) as usize
    }

    /// Input length in bytes, derived from the hex payload when the
    /// length field is absent.
    pub fn input_len_bytes(&self) -> usize {
        match self.input_len_bits {
            Some(bits) => (bits / 8) as usize,
            None => self.input.len() / 2,
        }
    }
}

/// A SHA-family test vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaVector {
    pub test_id: String,
    pub test_type: TestType,
    /// Digest width field, e.g. "256", sent verbatim as the mode.
    pub mode: String,
    pub input_len_bits: u64,
    pub input: String,
    /// Expected digest, present in verify-mode vector files.
    pub expected: Option<String>,
}

/// One parsed test vector, owned by the main iteration loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestVector {
    Aes(AesVector),
    Sha(ShaVector),
}

impl TestVector {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            TestVector::Aes(_) => Algorithm::Aes,
            TestVector::Sha(_) => Algorithm::Sha,
        }
    }

    /// Test ID, unique within one vector file. Used as the resumption key.
    pub fn test_id(&self) -> &str {
        match self {
            TestVector::Aes(v) => &v.test_id,
            TestVector::Sha(v) => &v.test_id,
        }
    }

    pub fn test_type(&self) -> TestType {
        match self {
            TestVector::Aes(v) => v.test_type,
            TestVector::Sha(v) => v.test_type,
        }
    }

    /// Expected response for verify mode, if the file carried one.
    pub fn expected(&self) -> Option<&str> {
        match self {
            TestVector::Aes(v) => v.expected.as_deref(),
            TestVector::Sha(v) => v.expected.as_deref(),
        }
    }
}
