use std::io::Cursor;

use cavp_host::runner::{run, CancelFlag, RunPolicy};
use cavp_protocol::testing::ScriptedTransport;
use cavp_protocol::{HandshakeSession, ResultStore, SessionConfig};
use tempfile::tempdir;

const SHA_DIGEST: &str = "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb";

fn sha_vector_line() -> String {
    format!("algo:sha test:1 mode:256 type:aft length:8 input:61 output:{SHA_DIGEST}")
}

fn sha_script(response: &str) -> Vec<String> {
    vec![
        "target-ready".into(),
        "t-ack".into(),
        "t-start-ack".into(),
        "t-algo-ack".into(),
        "t-type-ack".into(),
        "t-modop-ack".into(),
        "t-il-ack".into(),
        "t-input-ack".into(),
        format!("response-end: {response}"),
    ]
}

fn make_session(script: Vec<String>) -> HandshakeSession<ScriptedTransport> {
    HandshakeSession::new(ScriptedTransport::new(script), SessionConfig::default())
}

// --------------------------------------------------------------------- //
// Verify policy
// --------------------------------------------------------------------- //

#[test]
fn matching_response_is_marked_ok() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();
    let mut session = make_session(sha_script(SHA_DIGEST));

    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 0);

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("TEST VECTOR 1 OK"));
}

#[test]
fn mismatching_response_is_marked_nok_and_reprocessed() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();

    // Response differs from the expected digest in its first character.
    let mut wrong = String::from("0");
    wrong.push_str(&SHA_DIGEST[1..]);
    let mut session = make_session(sha_script(&wrong));

    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();
    assert_eq!(summary.failed, 1);

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("TEST VECTOR 1 NOK"));
    assert!(!content.contains("TEST VECTOR 1 OK"));

    // A NOK vector is not complete, so the next run exchanges it again.
    let mut session = make_session(sha_script(SHA_DIGEST));
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.passed, 1);
}

#[test]
fn completed_vectors_are_skipped_on_rerun() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();

    let mut first = make_session(sha_script(SHA_DIGEST));
    run(
        &mut first,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();

    // The rerun never opens a vector exchange.
    let mut second = make_session(vec!["target-ready".into(), "t-ack".into()]);
    let summary = run(
        &mut second,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(
        second.into_transport().sent(),
        ["Hello", "-end"]
    );
}

#[test]
fn comments_and_blank_lines_produce_no_exchange() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();
    let mut session = make_session(vec!["target-ready".into(), "t-ack".into()]);

    let input = "# header comment\n\n# another comment\n";
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(input),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();

    assert_eq!(summary, Default::default());
    assert_eq!(session.into_transport().sent(), ["Hello", "-end"]);

    // Nothing reaches the result file either.
    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.is_empty());
}

#[test]
fn unparsable_lines_are_skipped_without_aborting() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();
    let mut session = make_session(sha_script(SHA_DIGEST));

    let input = format!("algo:sha test:9 type:aft mode:256 length:13 input:61\n{}\n", sha_vector_line());
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(input),
        "v.txt",
        RunPolicy::Verify,
        &CancelFlag::new(),
    )
    .unwrap();

    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.passed, 1);
}

#[test]
fn cancellation_stops_before_the_next_vector() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("v.result")).unwrap();
    let mut session = make_session(vec!["target-ready".into(), "t-ack".into()]);

    let cancel = CancelFlag::new();
    cancel.cancel();
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "v.txt",
        RunPolicy::Verify,
        &cancel,
    )
    .unwrap();

    assert_eq!(summary.processed, 0);
    // The session still shuts the target down cleanly.
    assert_eq!(session.into_transport().sent(), ["Hello", "-end"]);
}

// --------------------------------------------------------------------- //
// Capture policy
// --------------------------------------------------------------------- //

#[test]
fn capture_records_a_block_and_never_resumes() {
    let dir = tempdir().unwrap();
    let mut store = ResultStore::open(dir.path().join("c.result")).unwrap();

    let mut session = make_session(sha_script(SHA_DIGEST));
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "c.txt",
        RunPolicy::Capture,
        &CancelFlag::new(),
    )
    .unwrap();
    assert_eq!(summary.processed, 1);

    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.starts_with("CAVP test tool "));
    assert!(content.contains("c.txt"));
    assert!(content.contains("\"tcId\": 1,"));
    assert!(content.contains(&format!("\"md\": \"{}\"", SHA_DIGEST.to_ascii_uppercase())));
    assert!(!content.contains("TEST VECTOR"));

    // Capture has no resumption markers, so a second run exchanges the
    // vector again.
    let mut session = make_session(sha_script(SHA_DIGEST));
    let summary = run(
        &mut session,
        &mut store,
        Cursor::new(sha_vector_line()),
        "c.txt",
        RunPolicy::Capture,
        &CancelFlag::new(),
    )
    .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
}

