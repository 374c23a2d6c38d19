//! Multi-line response reassembly.
//!
//! The target streams a long hex response as a sequence of prefixed
//! fragments. The first fragment line contains the `response` marker;
//! from then on every line belongs to the response until a line carrying
//! the `response-end` marker closes it. Fragment lines strip a fixed
//! prefix (`response: ` or `response-end: `) before their hex is kept.

/// Marker that opens a response stream.
pub const RESPONSE_MARKER: &str = "response";
/// Marker on the final fragment line.
pub const RESPONSE_END_MARKER: &str = "response-end";

/// Hex offset on intermediate fragment lines (`response: `).
const FRAGMENT_PREFIX: usize = 10;
/// Hex offset on the closing fragment line (`response-end: `).
const FINAL_FRAGMENT_PREFIX: usize = 14;

/// Outcome of feeding one line to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    /// Line arrived before the response started and is not part of it.
    Ignored,
    /// Line contributed a fragment; more are expected.
    Fragment,
    /// Line closed the response.
    Complete,
}

/// Accumulates response fragments into one hex payload.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    buf: String,
    started: bool,
    complete: bool,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sanitized line. Lines before the opening marker are
    /// ignored; once the response has started, every line is a fragment
    /// until the end marker arrives.
    pub fn ingest(&mut self, line: &str) -> Ingest {
        if !self.started && !line.contains(RESPONSE_MARKER) {
            return Ingest::Ignored;
        }
        self.started = true;
        if line.contains(RESPONSE_END_MARKER) {
            self.buf.push_str(line.get(FINAL_FRAGMENT_PREFIX..).unwrap_or(""));
            self.complete = true;
            Ingest::Complete
        } else {
            self.buf.push_str(line.get(FRAGMENT_PREFIX..).unwrap_or(""));
            Ingest::Fragment
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Consume the assembler and return the reassembled payload as
    /// uppercase hex.
    pub fn finish(self) -> String {
        self.buf.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_response() {
        let mut asm = ResponseAssembler::new();
        assert_eq!(asm.ingest("response-end: abcd1234"), Ingest::Complete);
        assert!(asm.is_complete());
        assert_eq!(asm.finish(), "ABCD1234");
    }

    #[test]
    fn multi_fragment_response_concatenates_in_order() {
        let mut asm = ResponseAssembler::new();
        assert_eq!(asm.ingest("response: aaaa"), Ingest::Fragment);
        assert_eq!(asm.ingest("response: bbbb"), Ingest::Fragment);
        assert_eq!(asm.ingest("response-end: cccc"), Ingest::Complete);
        assert_eq!(asm.finish(), "AAAABBBBCCCC");
    }

    #[test]
    fn chatter_before_the_response_is_ignored() {
        let mut asm = ResponseAssembler::new();
        assert_eq!(asm.ingest("t-input-ack"), Ingest::Ignored);
        assert_eq!(asm.ingest("debug: engine busy"), Ingest::Ignored);
        assert_eq!(asm.ingest("response: 1234"), Ingest::Fragment);
        assert_eq!(asm.ingest("response-end: 5678"), Ingest::Complete);
        assert_eq!(asm.finish(), "12345678");
    }

    #[test]
    fn every_line_after_start_is_a_fragment() {
        // Lines without the marker still contribute once the response
        // has opened; their first ten characters are prefix.
        let mut asm = ResponseAssembler::new();
        asm.ingest("response: aaaa");
        assert_eq!(asm.ingest("fragment: bbbb"), Ingest::Fragment);
        asm.ingest("response-end: cccc");
        assert_eq!(asm.finish(), "AAAABBBBCCCC");
    }

    #[test]
    fn short_end_line_yields_empty_tail() {
        let mut asm = ResponseAssembler::new();
        asm.ingest("response: ffff");
        assert_eq!(asm.ingest("response-end:"), Ingest::Complete);
        assert_eq!(asm.finish(), "FFFF");
    }

    #[test]
    fn not_complete_until_end_marker() {
        let mut asm = ResponseAssembler::new();
        asm.ingest("response: 00");
        assert!(!asm.is_complete());
    }
}
