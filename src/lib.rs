//! Moderated chat application entry point.
//!
//! This is the shell that wires together:
//! - Configuration (config.rs)
//! - Denylist screening and redaction (safety/)
//! - The chat-completion client (llm/)
//! - The per-turn pipeline (pipeline.rs)
//! - Terminal and HTTP callers (cli.rs, server/)

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod safety;
pub mod server;

pub use config::{Config, ConfigError};
pub use error::{ErrorKind, TurnError};
pub use pipeline::{ChatPipeline, ChatTurnResult, TurnOutcome};

use clap::Parser;
use cli::{Cli, Commands};
use std::io::Write;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Called by the binary.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let default_command = Commands::Chat;
    let command = cli.command.as_ref().unwrap_or(&default_command);

    let default_filter = match command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match Config::from_env_with(&cli.config_overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };
    log::debug!("[CONFIG] {:?}", config);

    if !config.has_api_key() {
        eprintln!(
            "WARNING: no API key set. Set MODCHAT_API_KEY or {} before chatting.",
            config.provider.env_key
        );
    }

    let pipeline = match ChatPipeline::from_config(&config) {
        Ok(pipeline) => Arc::new(pipeline),
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    match command {
        Commands::Chat => run_interactive(&pipeline).await,
        Commands::Ask { prompt } => run_single(&pipeline, &prompt.join(" ")).await,
        Commands::Serve { .. } => {
            let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
            match server::serve(addr, pipeline, config.static_dir.as_deref()).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("[SERVER] {}", e);
                    eprintln!("Server error: {}", e);
                    ExitCode::from(1)
                }
            }
        }
    }
}

async fn run_single(pipeline: &ChatPipeline, prompt: &str) -> ExitCode {
    let result = pipeline.run_turn(prompt).await;
    print_turn(&result);
    ExitCode::from(cli::exit_code(&result))
}

async fn run_interactive(pipeline: &ChatPipeline) -> ExitCode {
    println!("Ask me anything. Type 'exit' to quit.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                return ExitCode::from(1);
            }
        };
        if cli::is_exit_command(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let result = pipeline.run_turn(&line).await;
        print_turn(&result);
        println!();
    }

    ExitCode::SUCCESS
}

fn print_turn(result: &ChatTurnResult) {
    let rendered = cli::render(result);
    if let Some(err) = rendered.stderr {
        eprintln!("{}", err);
    }
    if let Some(text) = rendered.stdout {
        println!("AI: {}", text);
    }
}
