//! Monte Carlo response slicing.
//!
//! An MCT response concatenates exactly 100 equally sized checkpoint
//! slices. Each slice packs the checkpoint key, the IV for feedback
//! modes, and one plaintext/ciphertext block pair; which value sits
//! where depends on the mode family and the cipher direction, so the
//! layouts are data, not control flow.

use crate::error::RecordError;
use crate::vector::Direction;

/// One Monte Carlo checkpoint, fields in rendered order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McEntry {
    pub key: String,
    pub iv: Option<String>,
    pub pt: String,
    pub ct: String,
}

#[derive(Debug, Clone, Copy)]
enum McField {
    Key,
    Iv,
    Pt,
    Ct,
}

#[derive(Debug, Clone, Copy)]
enum SliceLen {
    /// Key length of the vector, in hex chars.
    KeyWidth,
    /// One 16-byte cipher block.
    BlockWidth,
    /// Whatever the slice has left.
    Remainder,
}

/// Hex chars in one cipher block.
const BLOCK_HEX: usize = 32;

const FEEDBACK_ENCRYPT: &[(McField, SliceLen)] = &[
    (McField::Key, SliceLen::KeyWidth),
    (McField::Iv, SliceLen::BlockWidth),
    (McField::Pt, SliceLen::BlockWidth),
    (McField::Ct, SliceLen::Remainder),
];

const FEEDBACK_DECRYPT: &[(McField, SliceLen)] = &[
    (McField::Key, SliceLen::KeyWidth),
    (McField::Iv, SliceLen::BlockWidth),
    (McField::Ct, SliceLen::BlockWidth),
    (McField::Pt, SliceLen::Remainder),
];

const ECB_ENCRYPT: &[(McField, SliceLen)] = &[
    (McField::Key, SliceLen::KeyWidth),
    (McField::Pt, SliceLen::BlockWidth),
    (McField::Ct, SliceLen::Remainder),
];

const ECB_DECRYPT: &[(McField, SliceLen)] = &[
    (McField::Key, SliceLen::KeyWidth),
    (McField::Ct, SliceLen::BlockWidth),
    (McField::Pt, SliceLen::Remainder),
];

fn layout(is_ecb: bool, direction: Direction) -> &'static [(McField, SliceLen)] {
    match (is_ecb, direction) {
        (false, Direction::Encrypt) => FEEDBACK_ENCRYPT,
        (false, Direction::Decrypt) => FEEDBACK_DECRYPT,
        (true, Direction::Encrypt) => ECB_ENCRYPT,
        (true, Direction::Decrypt) => ECB_DECRYPT,
    }
}

/// Cut a Monte Carlo response into its 100 checkpoint entries.
pub fn expand(
    is_ecb: bool,
    direction: Direction,
    key_len_bytes: usize,
    response: &str,
) -> Result<Vec<McEntry>, RecordError> {
    if response.is_empty() {
        return Err(RecordError::EmptyResponse);
    }
    if response.len() % 100 != 0 {
        return Err(RecordError::NotDivisibleBy100(response.len()));
    }

    let slice_len = response.len() / 100;
    let key_hex = key_len_bytes * 2;
    let fields = layout(is_ecb, direction);

    let fixed: usize = fields
        .iter()
        .map(|(_, len)| match len {
            SliceLen::KeyWidth => key_hex,
            SliceLen::BlockWidth => BLOCK_HEX,
            SliceLen::Remainder => 0,
        })
        .sum();
    if slice_len < fixed {
        return Err(RecordError::SliceTooShort {
            slice: slice_len,
            need: fixed,
        });
    }

    let mut entries = Vec::with_capacity(100);
    for i in 0..100 {
        let slice = &response[i * slice_len..(i + 1) * slice_len];
        let mut cursor = 0;
        let mut key = String::new();
        let mut iv = None;
        let mut pt = String::new();
        let mut ct = String::new();
        for (field, len) in fields {
            let take = match len {
                SliceLen::KeyWidth => key_hex,
                SliceLen::BlockWidth => BLOCK_HEX,
                SliceLen::Remainder => slice.len() - cursor,
            };
            let value = slice[cursor..cursor + take].to_string();
            cursor += take;
            match field {
                McField::Key => key = value,
                McField::Iv => iv = Some(value),
                McField::Pt => pt = value,
                McField::Ct => ct = value,
            }
        }
        entries.push(McEntry { key, iv, pt, ct });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(key: &str, iv: Option<&str>, a: &str, b: &str) -> String {
        let mut s = key.to_string();
        if let Some(iv) = iv {
            s.push_str(iv);
        }
        s.push_str(a);
        s.push_str(b);
        s
    }

    #[test]
    fn cbc_encrypt_layout() {
        let key = "11".repeat(16);
        let iv = "22".repeat(16);
        let pt = "33".repeat(16);
        let ct = "44".repeat(16);
        let response = slice(&key, Some(&iv), &pt, &ct).repeat(100);

        let entries = expand(false, Direction::Encrypt, 16, &response).unwrap();
        assert_eq!(entries.len(), 100);
        let e = &entries[0];
        assert_eq!(e.key, key);
        assert_eq!(e.iv.as_deref(), Some(iv.as_str()));
        assert_eq!(e.pt, pt);
        assert_eq!(e.ct, ct);
    }

    #[test]
    fn cbc_decrypt_swaps_block_order() {
        let key = "11".repeat(32);
        let iv = "22".repeat(16);
        let ct = "33".repeat(16);
        let pt = "44".repeat(16);
        // Decrypt slices carry ct before pt.
        let response = slice(&key, Some(&iv), &ct, &pt).repeat(100);

        let entries = expand(false, Direction::Decrypt, 32, &response).unwrap();
        let e = &entries[42];
        assert_eq!(e.key, key);
        assert_eq!(e.ct, ct);
        assert_eq!(e.pt, pt);
    }

    #[test]
    fn ecb_layout_has_no_iv() {
        let key = "aa".repeat(16);
        let pt = "bb".repeat(16);
        let ct = "cc".repeat(16);
        let response = slice(&key, None, &pt, &ct).repeat(100);

        let entries = expand(true, Direction::Encrypt, 16, &response).unwrap();
        let e = &entries[0];
        assert_eq!(e.iv, None);
        assert_eq!(e.pt, pt);
        assert_eq!(e.ct, ct);
    }

    #[test]
    fn rejects_empty_and_unsliceable_responses() {
        assert_eq!(
            expand(true, Direction::Encrypt, 16, ""),
            Err(RecordError::EmptyResponse)
        );
        assert_eq!(
            expand(true, Direction::Encrypt, 16, "abc"),
            Err(RecordError::NotDivisibleBy100(3))
        );
    }

    #[test]
    fn rejects_slices_shorter_than_the_layout() {
        let response = "ab".repeat(100);
        assert_eq!(
            expand(false, Direction::Encrypt, 16, &response),
            Err(RecordError::SliceTooShort {
                slice: 2,
                need: 32 + 32 + 32
            })
        );
    }
}
