//! Wire tokens of the handshake dialect.
//!
//! Every token is an exact, case-sensitive line. The host-to-target
//! greeting and loop opener are fixed strings; each field the host
//! sends is confirmed by its own ack token.

/// First token the target emits after reset.
pub const TARGET_READY: &str = "target-ready";
/// Host greeting answered by [`TARGET_ACK`].
pub const GREETING: &str = "Hello";
/// Ack for the greeting.
pub const TARGET_ACK: &str = "t-ack";

/// Opens one test-vector exchange.
pub const LOOP_START: &str = "loop";
pub const START_ACK: &str = "t-start-ack";

pub const ALGO_ACK: &str = "t-algo-ack";
pub const TYPE_ACK: &str = "t-type-ack";
pub const MODE_ACK: &str = "t-modop-ack";
pub const KEYLEN_ACK: &str = "t-kl-ack";
pub const OP_ACK: &str = "t-op-ack";
pub const KEY_ACK: &str = "t-key-ack";
pub const IVLEN_ACK: &str = "t-ivl-ack";
pub const IV_ACK: &str = "t-iv-ack";
pub const AADLEN_ACK: &str = "t-aadl-ack";
pub const AAD_ACK: &str = "t-aad-ack";
pub const TAGLEN_ACK: &str = "t-tagl-ack";
pub const TAG_ACK: &str = "t-tag-ack";
pub const INPUTLEN_ACK: &str = "t-il-ack";
pub const INPUT_ACK: &str = "t-input-ack";

/// Shutdown notification. The target does not acknowledge it.
pub const SESSION_END: &str = "-end";
