//! The run loop: one pass over a vector file against one session.
//!
//! Two policies share the loop. Verify compares each response against
//! the vector's expected output, records OK/NOK markers, and skips
//! vectors already marked OK. Capture renders every response into the
//! result file verbatim and never skips: capture output carries no
//! markers, so there is nothing to resume from.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use cavp_core::{format_record, parse_line, render_capture};
use cavp_protocol::{completion_marker, failure_marker, HandshakeSession, LineTransport, ResultStore};

use crate::error::HostError;

/// Tool version recorded in capture headers.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do with each assembled response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPolicy {
    /// Compare against expected outputs and keep a resumption ledger.
    Verify,
    /// Record raw result blocks, reprocessing everything on each run.
    Capture,
}

/// Cooperative cancellation, checked between vectors. Cancelling
/// mid-vector would leave the target in an undefined state, so the
/// in-flight vector always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Vectors that completed a full protocol exchange.
    pub processed: usize,
    pub passed: usize,
    pub failed: usize,
    /// Vectors skipped because their completion marker already existed.
    pub skipped: usize,
    /// Lines that could not be parsed or responses that could not be
    /// sliced into a record.
    pub rejected: usize,
}

/// Drive every vector in `reader` through the session.
///
/// Per-vector problems (unparsable line, unsliceable response) are
/// logged and skipped; session and store failures abort the run.
pub fn run<T: LineTransport>(
    session: &mut HandshakeSession<T>,
    store: &mut ResultStore,
    reader: impl BufRead,
    input_name: &str,
    policy: RunPolicy,
    cancel: &CancelFlag,
) -> Result<RunSummary, HostError> {
    let mut summary = RunSummary::default();

    if policy == RunPolicy::Capture {
        store.append_line(&format!("CAVP test tool {VERSION}"))?;
        store.append_line(input_name)?;
    }

    session.start()?;

    for (line_nb, line) in reader.lines().enumerate() {
        if cancel.is_cancelled() {
            info!("cancellation requested, stopping before the next vector");
            break;
        }
        let line = line?;
        let vector = match parse_line(&line) {
            Ok(Some(vector)) => vector,
            Ok(None) => continue,
            Err(e) => {
                warn!(line_nb, error = %e, "skipping unparsable vector line");
                summary.rejected += 1;
                continue;
            }
        };
        let test_id = vector.test_id().to_string();

        if policy == RunPolicy::Verify && store.is_complete(&test_id)? {
            info!(test_id, "already complete, skipping");
            summary.skipped += 1;
            continue;
        }

        let response = session.run_vector(&vector)?;
        summary.processed += 1;

        match policy {
            RunPolicy::Verify => match vector.expected() {
                Some(expected) if response.eq_ignore_ascii_case(expected) => {
                    info!(test_id, "verified");
                    summary.passed += 1;
                    store.append_line(&completion_marker(&test_id))?;
                }
                Some(expected) => {
                    warn!(test_id, received = %response, expected, "response does not match");
                    summary.failed += 1;
                    store.append_line(&failure_marker(&test_id))?;
                }
                None => {
                    warn!(test_id, "no expected output in vector file");
                    summary.failed += 1;
                    store.append_line(&failure_marker(&test_id))?;
                }
            },
            RunPolicy::Capture => match format_record(&vector, &response) {
                Ok(record) => {
                    store.append_block(&render_capture(&record))?;
                }
                Err(e) => {
                    warn!(test_id, error = %e, "response could not be formatted");
                    summary.rejected += 1;
                }
            },
        }
    }

    session.finish()?;
    info!(
        processed = summary.processed,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        rejected = summary.rejected,
        "run finished"
    );
    Ok(summary)
}
