//! Failure taxonomy shared by the pipeline, the CLI and the HTTP surface.
//!
//! Every failure is terminal for the turn it occurred in. Nothing here is
//! retried.

use serde::Serialize;
use std::fmt;

/// Why a chat turn did not deliver model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Message was missing or blank after trimming.
    EmptyInput,
    /// Input matched the denylist and was never forwarded.
    PolicyViolation,
    /// No API key was configured; no request was attempted.
    Configuration,
    /// Network failure or non-success HTTP status from the provider.
    TransportOrServer,
    /// Success status, but the body did not carry a usable message.
    MalformedResponse,
}

impl ErrorKind {
    /// Caller-side mistakes map to 400, everything else to 500.
    pub fn is_client_error(self) -> bool {
        matches!(self, ErrorKind::EmptyInput | ErrorKind::PolicyViolation)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::PolicyViolation => "policy_violation",
            ErrorKind::Configuration => "configuration",
            ErrorKind::TransportOrServer => "transport_or_server",
            ErrorKind::MalformedResponse => "malformed_response",
        };
        f.write_str(name)
    }
}

/// The error attached to a turn that ended without delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TurnError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TurnError {}
