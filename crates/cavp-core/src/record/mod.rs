//! Result-record construction.
//!
//! An assembled response is one flat uppercase hex string; its meaning
//! depends entirely on the vector that produced it. This module slices
//! the response into a typed [`ResultRecord`] so verification and
//! capture rendering never reinterpret raw offsets themselves.

mod mct;
mod render;

pub use mct::McEntry;
pub use render::render_capture;

use crate::error::RecordError;
use crate::vector::{AesMode, AesVector, Direction, ShaVector, TestType, TestVector};

/// Semantic body of one result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    /// Ciphertext, with the authentication tag split out when the mode
    /// transmits one.
    Cipher { ct: String, tag: Option<String> },
    /// Recovered plaintext.
    Plain { pt: String },
    /// Authenticated decryption failed tag verification on the target.
    Rejected,
    /// Message digest.
    Digest { md: String },
    /// Monte Carlo cipher iterations, one entry per checkpoint.
    CipherTrace(Vec<McEntry>),
    /// Monte Carlo digest iterations.
    DigestTrace(Vec<String>),
}

/// One formatted result, ready for verification or capture rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub test_id: String,
    pub body: RecordBody,
}

/// Sentinel the target sends in place of a tag when authenticated
/// decryption rejects the input.
const REJECTED_SENTINEL: &str = "FALSE";

/// Slice an assembled response into the record shape its vector implies.
pub fn format_record(vector: &TestVector, response: &str) -> Result<ResultRecord, RecordError> {
    let body = match vector {
        TestVector::Aes(v) => format_aes(v, response)?,
        TestVector::Sha(v) => format_sha(v, response)?,
    };
    Ok(ResultRecord {
        test_id: vector.test_id().to_string(),
        body,
    })
}

fn format_aes(vector: &AesVector, response: &str) -> Result<RecordBody, RecordError> {
    match vector.test_type {
        TestType::Aft | TestType::Ctr => format_aes_single(vector, response),
        TestType::Mct => {
            let entries = mct::expand(
                vector.mode.is_ecb(),
                vector.direction,
                vector.key_len_bytes(),
                response,
            )?;
            Ok(RecordBody::CipherTrace(entries))
        }
    }
}

fn format_aes_single(vector: &AesVector, response: &str) -> Result<RecordBody, RecordError> {
    let split = vector.input_len_bytes() * 2;
    match (&vector.mode, vector.direction) {
        // GCM appends the tag to the ciphertext.
        (AesMode::Gcm, Direction::Encrypt) => {
            let (ct, tag) = split_at_payload(response, split)?;
            Ok(RecordBody::Cipher {
                ct: ct.to_string(),
                tag: Some(tag.to_string()),
            })
        }
        // GCM and CCM signal a failed tag check after the payload split.
        (AesMode::Gcm, Direction::Decrypt) | (AesMode::Ccm, Direction::Decrypt) => {
            let (pt, rest) = split_at_payload(response, split)?;
            if rest == REJECTED_SENTINEL {
                Ok(RecordBody::Rejected)
            } else {
                Ok(RecordBody::Plain { pt: pt.to_string() })
            }
        }
        // CCM ciphertext already carries its tag inline.
        (_, Direction::Encrypt) => Ok(RecordBody::Cipher {
            ct: response.to_string(),
            tag: None,
        }),
        (_, Direction::Decrypt) => Ok(RecordBody::Plain {
            pt: response.to_string(),
        }),
    }
}

fn format_sha(vector: &ShaVector, response: &str) -> Result<RecordBody, RecordError> {
    match vector.test_type {
        TestType::Aft | TestType::Ctr => Ok(RecordBody::Digest {
            md: response.to_string(),
        }),
        TestType::Mct => {
            if response.is_empty() {
                return Err(RecordError::EmptyResponse);
            }
            if response.len() % 100 != 0 {
                return Err(RecordError::NotDivisibleBy100(response.len()));
            }
            let md_len = response.len() / 100;
            let digests = (0..100)
                .map(|i| response[i * md_len..(i + 1) * md_len].to_string())
                .collect();
            Ok(RecordBody::DigestTrace(digests))
        }
    }
}

fn split_at_payload(response: &str, split: usize) -> Result<(&str, &str), RecordError> {
    if response.len() < split {
        return Err(RecordError::ResponseTooShort {
            actual: response.len(),
            split,
        });
    }
    Ok(response.split_at(split))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn parse(line: &str) -> TestVector {
        parse_line(line).unwrap().unwrap()
    }

    // ----------------------------------------------------------------- //
    // AES single-shot
    // ----------------------------------------------------------------- //

    const GCM_ENCRYPT: &str = "algo:aes type:aft test:7 modeop:gcm keylen:128 \
        key:000102030405060708090a0b0c0d0e0f operation:encrypt \
        ivlen:96 iv:505152535455565758595a5b aadlen:0 taglen:128 \
        inputlen:128 input:202122232425262728292a2b2c2d2e2f";

    #[test]
    fn gcm_encrypt_splits_tag_after_payload() {
        let v = parse(GCM_ENCRYPT);
        let ct = "AA".repeat(16);
        let tag = "BB".repeat(16);
        let record = format_record(&v, &format!("{ct}{tag}")).unwrap();
        assert_eq!(record.test_id, "7");
        assert_eq!(
            record.body,
            RecordBody::Cipher {
                ct,
                tag: Some(tag)
            }
        );
    }

    #[test]
    fn gcm_encrypt_short_response_is_an_error() {
        let v = parse(GCM_ENCRYPT);
        assert_eq!(
            format_record(&v, "AABB"),
            Err(RecordError::ResponseTooShort {
                actual: 4,
                split: 32
            })
        );
    }

    const GCM_DECRYPT: &str = "algo:aes type:aft test:8 modeop:gcm keylen:128 \
        key:000102030405060708090a0b0c0d0e0f operation:decrypt \
        ivlen:96 iv:505152535455565758595a5b aadlen:0 \
        taglen:128 tag:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb \
        inputlen:128 input:202122232425262728292a2b2c2d2e2f";

    #[test]
    fn gcm_decrypt_false_sentinel_is_rejected() {
        let v = parse(GCM_DECRYPT);
        let pt = "CC".repeat(16);
        let record = format_record(&v, &format!("{pt}FALSE")).unwrap();
        assert_eq!(record.body, RecordBody::Rejected);
    }

    #[test]
    fn gcm_decrypt_passing_tag_yields_plaintext() {
        let v = parse(GCM_DECRYPT);
        let pt = "CC".repeat(16);
        let record = format_record(&v, &pt).unwrap();
        assert_eq!(record.body, RecordBody::Plain { pt });
    }

    #[test]
    fn ccm_encrypt_keeps_tag_inline() {
        let line = "algo:aes type:aft test:9 modeop:ccm keylen:128 \
            key:000102030405060708090a0b0c0d0e0f operation:encrypt \
            ivlen:56 iv:50515253545556 aadlen:0 taglen:32 \
            inputlen:32 input:20212223";
        let v = parse(line);
        let record = format_record(&v, "AABBCCDDEEFF0011").unwrap();
        assert_eq!(
            record.body,
            RecordBody::Cipher {
                ct: "AABBCCDDEEFF0011".into(),
                tag: None
            }
        );
    }

    #[test]
    fn cbc_decrypt_takes_whole_response_as_plaintext() {
        let line = "algo:aes type:aft test:3 modeop:cbc keylen:128 \
            key:000102030405060708090a0b0c0d0e0f operation:decrypt \
            ivlen:128 iv:101112131415161718191a1b1c1d1e1f \
            inputlen:128 input:202122232425262728292a2b2c2d2e2f";
        let v = parse(line);
        let pt = "DD".repeat(16);
        let record = format_record(&v, &pt).unwrap();
        assert_eq!(record.body, RecordBody::Plain { pt });
    }

    // ----------------------------------------------------------------- //
    // SHA
    // ----------------------------------------------------------------- //

    const SHA_AFT: &str = "algo:sha mode:256 type:aft test:1 length:8 input:61";

    #[test]
    fn sha_aft_is_a_digest() {
        let v = parse(SHA_AFT);
        let record = format_record(&v, "ABCDEF").unwrap();
        assert_eq!(record.body, RecordBody::Digest { md: "ABCDEF".into() });
    }

    #[test]
    fn sha_mct_slices_one_hundred_digests() {
        let line = "algo:sha mode:256 type:mct test:2 length:8 input:61";
        let v = parse(line);
        let response: String = (0..100).map(|i| format!("{i:02}")).collect();
        let record = format_record(&v, &response).unwrap();
        match record.body {
            RecordBody::DigestTrace(digests) => {
                assert_eq!(digests.len(), 100);
                assert_eq!(digests[0], "00");
                assert_eq!(digests[99], "99");
            }
            other => panic!("expected digest trace, got {other:?}"),
        }
    }

    #[test]
    fn sha_mct_rejects_unsliceable_responses() {
        let line = "algo:sha mode:256 type:mct test:2 length:8 input:61";
        let v = parse(line);
        assert_eq!(format_record(&v, ""), Err(RecordError::EmptyResponse));
        assert_eq!(
            format_record(&v, "ABC"),
            Err(RecordError::NotDivisibleBy100(3))
        );
    }
}
