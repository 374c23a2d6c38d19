//! Tolerant, order-independent vector-line parser.
//!
//! Each non-comment line is a whitespace-separated list of `name:value`
//! tokens. Field order is not significant: length-style fields are found
//! by substring match on the token name (`keylen`, `ivlen`, ...) while
//! payload fields match the name exactly so `key` never collides with
//! `keylen`. A missing mandatory field is a structured [`VectorError`],
//! never an out-of-range access.

use crate::error::VectorError;
use crate::vector::{AesMode, AesVector, Direction, ShaVector, TestType, TestVector};

/// The normalized `name -> value` map extracted from one line.
///
/// Names and values are lower-cased. Tokens without a `:` separator are
/// dropped. Duplicate names keep their first occurrence, matching the
/// first-match lookup semantics below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(String, String)>,
}

impl FieldMap {
    /// Split a raw line into lower-cased `name:value` pairs.
    pub fn tokenize(line: &str) -> Self {
        let lowered = line.to_ascii_lowercase();
        let fields = lowered
            .split_whitespace()
            .filter_map(|tok| {
                tok.split_once(':')
                    .map(|(name, value)| (name.to_string(), value.to_string()))
            })
            .collect();
        Self { fields }
    }

    /// First field whose name equals `name`.
    pub fn get_exact(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First field whose name contains `needle`.
    pub fn get_containing(&self, needle: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.contains(needle))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse one vector-file line.
///
/// Returns `Ok(None)` for blank lines and `#` comments: they produce no
/// vector, no protocol exchange, and no result-file write.
pub fn parse_line(line: &str) -> Result<Option<TestVector>, VectorError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let map = FieldMap::tokenize(trimmed);
    let algorithm = require(&map, "algo")?;
    match algorithm {
        "aes" => parse_aes(&map).map(TestVector::Aes).map(Some),
        "sha" => parse_sha(&map).map(TestVector::Sha).map(Some),
        other => Err(VectorError::UnknownAlgorithm(other.to_string())),
    }
}

fn parse_aes(map: &FieldMap) -> Result<AesVector, VectorError> {
    let test_id = require(map, "test")?.to_string();

    let type_str = require(map, "type")?;
    let test_type = TestType::parse(type_str).ok_or_else(|| VectorError::InvalidValue {
        field: "type",
        value: type_str.to_string(),
    })?;

    let mode = AesMode::parse(require(map, "mode")?);

    let key_len_bits = parse_bits("keylen", require(map, "keylen")?)?;
    byte_aligned("keylen", key_len_bits)?;

    let op_str = require(map, "operation")?;
    let direction = Direction::parse(op_str).ok_or_else(|| VectorError::InvalidValue {
        field: "operation",
        value: op_str.to_string(),
    })?;

    let key = require_hex_exact(map, "key")?;
    matching_length("key", Some(&key), Some(key_len_bits))?;

    let input = require_hex_exact(map, "input")?;

    let iv = optional_hex_exact(map, "iv")?;
    let iv_len_bits = optional_bits(map, "ivlen")?;
    matching_length("iv", iv.as_deref(), iv_len_bits)?;

    let aad = optional_hex_exact(map, "aad")?;
    let aad_len_bits = optional_bits(map, "aadlen")?;
    matching_length("aad", aad.as_deref(), aad_len_bits)?;

    let tag = optional_hex_exact(map, "tag")?;
    let tag_len_bits = optional_bits(map, "taglen")?;
    matching_length("tag", tag.as_deref(), tag_len_bits)?;

    let input_len_bits = optional_bits(map, "inputlen")?;
    matching_length("input", Some(&input), input_len_bits)?;

    let expected = map.get_containing("output").map(str::to_string);

    Ok(AesVector {
        test_id,
        test_type,
        mode,
        key_len_bits: key_len_bits as u32,
        key,
        direction,
        iv,
        iv_len_bits,
        aad,
        aad_len_bits,
        tag,
        tag_len_bits,
        input,
        input_len_bits,
        expected,
    })
}

fn parse_sha(map: &FieldMap) -> Result<ShaVector, VectorError> {
    let test_id = require(map, "test")?.to_string();

    let type_str = require(map, "type")?;
    let test_type = TestType::parse(type_str).ok_or_else(|| VectorError::InvalidValue {
        field: "type",
        value: type_str.to_string(),
    })?;

    let mode = require(map, "mode")?.to_string();

    let input_len_bits = parse_bits("length", require(map, "length")?)?;
    byte_aligned("length", input_len_bits)?;

    let input = require_hex_exact(map, "input")?;
    matching_length("input", Some(&input), Some(input_len_bits))?;

    let expected = map.get_containing("output").map(str::to_string);

    Ok(ShaVector {
        test_id,
        test_type,
        mode,
        input_len_bits,
        input,
        expected,
    })
}

fn require<'a>(map: &'a FieldMap, needle: &'static str) -> Result<&'a str, VectorError> {
    map.get_containing(needle)
        .ok_or(VectorError::MissingField(needle))
}

fn require_hex_exact(map: &FieldMap, name: &'static str) -> Result<String, VectorError> {
    let value = map
        .get_exact(name)
        .ok_or(VectorError::MissingField(name))?;
    ensure_hex(name, value)?;
    Ok(value.to_string())
}

fn optional_hex_exact(map: &FieldMap, name: &'static str) -> Result<Option<String>, VectorError> {
    match map.get_exact(name) {
        Some(value) => {
            ensure_hex(name, value)?;
            Ok(Some(value.to_string()))
        }
        None => Ok(None),
    }
}

fn optional_bits(map: &FieldMap, needle: &'static str) -> Result<Option<u64>, VectorError> {
    match map.get_containing(needle) {
        Some(value) => {
            let bits = parse_bits(needle, value)?;
            byte_aligned(needle, bits)?;
            Ok(Some(bits))
        }
        None => Ok(None),
    }
}

fn parse_bits(field: &'static str, value: &str) -> Result<u64, VectorError> {
    value.parse().map_err(|_| VectorError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn ensure_hex(field: &'static str, value: &str) -> Result<(), VectorError> {
    if hex::decode(value).is_err() {
        return Err(VectorError::InvalidHex {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn byte_aligned(field: &'static str, bits: u64) -> Result<(), VectorError> {
    if bits % 8 != 0 {
        return Err(VectorError::UnalignedLength { field, bits });
    }
    Ok(())
}

/// When a payload and its length field are both present, the hex length
/// must agree with the declared bit count (one hex char is four bits).
fn matching_length(
    field: &'static str,
    hex: Option<&str>,
    bits: Option<u64>,
) -> Result<(), VectorError> {
    if let (Some(hex), Some(bits)) = (hex, bits) {
        if hex.len() as u64 * 4 != bits {
            return Err(VectorError::LengthMismatch {
                field,
                hex_len: hex.len(),
                bits,
            });
        }
    }
    Ok(())
}
