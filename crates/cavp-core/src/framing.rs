//! Frame encoding and decoding primitives for the line-oriented channel.
//!
//! One logical value becomes one or more newline-terminated lines: bare
//! tokens go out verbatim, lengths as zero-padded fixed-width decimals,
//! and hex payloads chunked because the transport line buffer has a
//! bounded capacity. The receive side strips transport artifacts before
//! a line is interpreted as a protocol token.

/// Fixed decimal width of the IV length field (value in bits).
pub const IV_LEN_WIDTH: usize = 4;
/// Fixed decimal width of the tag length field (value in bits).
pub const TAG_LEN_WIDTH: usize = 4;
/// Fixed decimal width of the AAD length field (value in bits).
pub const AAD_LEN_WIDTH: usize = 5;
/// Fixed decimal width of the AES input length field (value in bytes).
pub const INPUT_LEN_WIDTH: usize = 5;
/// Fixed decimal width of the hash input length field (value in bits).
pub const SHA_INPUT_LEN_WIDTH: usize = 8;

/// Maximum hex characters per payload line (32 bytes per line).
pub const HEX_CHUNK_CHARS: usize = 64;

/// Zero-pad `value` to `width` decimal digits.
///
/// Values wider than the field are sent unpadded rather than truncated.
pub fn fixed_width_decimal(value: u64, width: usize) -> String {
    format!("{value:0width$}")
}

/// Split a hex payload into successive chunks of at most `max_chars`
/// characters, each destined for its own framed line.
///
/// `max_chars` must be even so chunks hold whole bytes. The final chunk
/// is the remainder and is sent even when shorter than the chunk size;
/// an empty payload yields no chunks at all.
pub fn chunk_hex(payload: &str, max_chars: usize) -> impl Iterator<Item = &str> {
    debug_assert!(max_chars > 0 && max_chars % 2 == 0);
    let len = payload.len();
    (0..len)
        .step_by(max_chars)
        .map(move |start| &payload[start..(start + max_chars).min(len)])
}

/// Strip transport artifacts from a received line: trailing CR/LF, a
/// leading byte-string marker with its quotes, and trailing literal
/// `\n` escape sequences.
pub fn sanitize_line(raw: &str) -> &str {
    let mut line = raw.trim_end_matches(['\r', '\n']);
    if let Some(rest) = line.strip_prefix("b'").or_else(|| line.strip_prefix("b\"")) {
        line = rest;
    }
    line = line.trim_matches(|c| c == '\'' || c == '"');
    while let Some(rest) = line.strip_suffix("\\n") {
        line = rest;
    }
    line
}
