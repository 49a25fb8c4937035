//! The per-turn chat pipeline: screen the input, call the provider once,
//! redact the reply.
//!
//! ```text
//! Received -> InputChecked -> Blocked
//!                          -> Calling -> Failed
//!                                     -> OutputChecked -> Delivered
//! ```
//!
//! Every turn is independent. The only shared state is the immutable denylist
//! and client settings, so one pipeline serves concurrent turns without locks.

use crate::config::Config;
use crate::error::{ErrorKind, TurnError};
use crate::llm::{CompletionClient, HttpTransport, ReqwestTransport, TransportError};
use crate::safety::{self, Denylist};
use serde::Serialize;
use std::sync::Arc;

/// Shown when input is blocked. Never echoes the offending text.
pub const POLICY_VIOLATION_MESSAGE: &str = "Your input violated the moderation policy. \
Please rephrase your question without harmful content.";

pub const EMPTY_INPUT_MESSAGE: &str = "Please provide a valid message";

/// Attached to delivered replies that had denylisted terms redacted.
pub const REDACTION_WARNING: &str = "Response contained inappropriate content (redacted)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Blocked,
    Delivered,
    Failed,
}

/// Final result of one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurnResult {
    pub outcome: TurnOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TurnError>,
}

impl ChatTurnResult {
    fn blocked() -> Self {
        Self {
            outcome: TurnOutcome::Blocked,
            text: None,
            warning: None,
            error: Some(TurnError::new(
                ErrorKind::PolicyViolation,
                POLICY_VIOLATION_MESSAGE,
            )),
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            outcome: TurnOutcome::Failed,
            text: None,
            warning: None,
            error: Some(TurnError::new(kind, message)),
        }
    }

    fn delivered(text: String, redacted: bool) -> Self {
        Self {
            outcome: TurnOutcome::Delivered,
            text: Some(text),
            warning: redacted.then(|| REDACTION_WARNING.to_string()),
            error: None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

pub struct ChatPipeline {
    denylist: Arc<Denylist>,
    client: CompletionClient,
}

impl ChatPipeline {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            denylist: Arc::new(config.denylist.clone()),
            client: CompletionClient::new(config, transport),
        }
    }

    /// Pipeline over the real network, bounded by the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Run one turn for `message` and report how it ended.
    pub async fn run_turn(&self, message: &str) -> ChatTurnResult {
        // Received
        if message.trim().is_empty() {
            log::info!("[PIPELINE] Rejected empty input");
            return ChatTurnResult::failed(ErrorKind::EmptyInput, EMPTY_INPUT_MESSAGE);
        }

        // InputChecked
        if safety::check_input(message, &self.denylist).flagged {
            log::info!("[PIPELINE] Blocked input");
            return ChatTurnResult::blocked();
        }

        // Calling
        let reply = match self.client.complete(message).await {
            Ok(reply) => reply,
            Err(e) => {
                log::info!("[PIPELINE] Turn failed ({}): {}", e.kind(), e);
                return ChatTurnResult::failed(e.kind(), e.to_string());
            }
        };

        // OutputChecked
        let moderated = safety::redact(&reply, &self.denylist);
        if moderated.flagged {
            log::info!("[PIPELINE] Delivered with redactions");
        } else {
            log::info!("[PIPELINE] Delivered");
        }
        ChatTurnResult::delivered(moderated.text, moderated.flagged)
    }
}
