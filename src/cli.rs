//! Command-line arguments and terminal rendering of turn results.
//!
//! Uses clap's derive API. Rendering is kept separate from I/O so the
//! exit-code and message rules can be tested without a terminal.

use crate::error::ErrorKind;
use crate::pipeline::{ChatTurnResult, TurnOutcome};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chat with an LLM through a denylist moderation layer.
///
/// Prompts containing denylisted terms are refused before they leave the
/// machine; replies have denylisted terms replaced with [REDACTED].
#[derive(Parser, Debug)]
#[command(name = "moderated-chat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// What to run. Defaults to the interactive `chat` loop.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider preset (openrouter, groq, deepseek).
    #[arg(long, global = true, value_name = "ID")]
    pub provider: Option<String>,

    /// Model name sent to the provider.
    #[arg(long, global = true, value_name = "NAME")]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive prompt loop. Type `exit` or `quit` (or send EOF) to stop.
    Chat,

    /// Send one prompt and exit.
    ///
    /// Exit status: 0 delivered, 1 provider or configuration failure,
    /// 2 blocked or empty input.
    Ask {
        /// The prompt. Multiple words are joined with spaces.
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Run the HTTP server (`POST /api/chat`, `GET /api/health`).
    Serve {
        /// Port to listen on (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static files served for non-API paths.
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Flag values expressed as configuration variables.
    pub fn config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(provider) = &self.provider {
            out.push(("MODCHAT_PROVIDER", provider.clone()));
        }
        if let Some(model) = &self.model {
            out.push(("MODCHAT_MODEL", model.clone()));
        }
        if let Some(Commands::Serve { port, static_dir }) = &self.command {
            if let Some(port) = port {
                out.push(("PORT", port.to_string()));
            }
            if let Some(dir) = static_dir {
                out.push(("MODCHAT_STATIC_DIR", dir.display().to_string()));
            }
        }
        out
    }
}

/// What the terminal shows for a turn: `stdout` for delivered text,
/// `stderr` for warnings and failures.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

pub fn render(result: &ChatTurnResult) -> Rendered {
    match result.outcome {
        TurnOutcome::Delivered => Rendered {
            stdout: result.text.clone(),
            stderr: result.warning.as_ref().map(|w| format!("Warning: {}", w)),
        },
        TurnOutcome::Blocked | TurnOutcome::Failed => Rendered {
            stdout: None,
            stderr: Some(match &result.error {
                Some(err) if err.kind == ErrorKind::PolicyViolation => err.message.clone(),
                Some(err) => format!("Error ({}): {}", err.kind, err.message),
                None => "Error: turn did not complete".to_string(),
            }),
        },
    }
}

/// Exit status for a single-shot `ask`.
pub fn exit_code(result: &ChatTurnResult) -> u8 {
    match (result.outcome, result.error_kind()) {
        (TurnOutcome::Delivered, _) => 0,
        (_, Some(kind)) if kind.is_client_error() => 2,
        _ => 1,
    }
}

/// True for lines that end the interactive loop.
pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}
