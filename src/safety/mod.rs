//! Safety layer: denylist screening on both sides of the provider call.
//!
//! User input is checked before it leaves the process and blocked on a match.
//! Model output is redacted before it reaches the caller and never blocked.

pub mod denylist;
pub mod filter;

pub use denylist::{Denylist, DenylistError};
pub use filter::{check_input, redact, scan, ModerationOutcome, REDACTION_MARKER};
