//! Capture-file rendering.
//!
//! Records render as JSON-like blocks, one per test, separated by a
//! blank line. The layout is the historical capture format consumed by
//! downstream tooling and is reproduced exactly, including the unpaired
//! braces around Monte Carlo arrays.

use super::{McEntry, RecordBody, ResultRecord};

/// Render one record as its capture-file block, trailing blank line
/// included.
pub fn render_capture(record: &ResultRecord) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str(&format!("\"tcId\": {},\n", record.test_id));
    match &record.body {
        RecordBody::Cipher { ct, tag } => {
            out.push_str(&format!("\"ct\": \"{ct}\"\n"));
            if let Some(tag) = tag {
                out.push_str(&format!("\"tag\": \"{tag}\"\n"));
            }
            out.push_str("},\n");
        }
        RecordBody::Plain { pt } => {
            out.push_str(&format!("\"pt\": \"{pt}\"\n"));
            out.push_str("},\n");
        }
        RecordBody::Rejected => {
            out.push_str("\"testPassed\": false\n");
            out.push_str("},\n");
        }
        RecordBody::Digest { md } => {
            out.push_str(&format!("\"md\": \"{md}\"\n"));
            out.push_str("},\n");
        }
        RecordBody::CipherTrace(entries) => {
            out.push_str("\"resultsArray\": [\n");
            for entry in entries {
                render_mc_entry(&mut out, entry);
            }
            out.push_str("]\n");
        }
        RecordBody::DigestTrace(digests) => {
            out.push_str("\"resultsArray\": [\n");
            for md in digests {
                out.push_str("{\n");
                out.push_str(&format!("\"md\": \"{md}\"\n"));
                out.push_str("},\n");
            }
            out.push_str("]\n");
        }
    }
    out.push('\n');
    out
}

fn render_mc_entry(out: &mut String, entry: &McEntry) {
    out.push_str("{\n");
    out.push_str(&format!("\"key\": \"{}\",\n", entry.key));
    if let Some(iv) = &entry.iv {
        out.push_str(&format!("\"iv\": \"{iv}\",\n"));
    }
    out.push_str(&format!("\"pt\": \"{}\",\n", entry.pt));
    out.push_str(&format!("\"ct\": \"{}\"\n", entry.ct));
    out.push_str("},\n");
}
