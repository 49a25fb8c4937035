//! LLM provider integration over OpenAI-compatible chat completions.
//!
//! One call per chat turn, always non-streaming, always OpenAI-compatible.

pub mod client;
pub mod prompts;
pub mod providers;
pub mod transport;
pub mod types;

pub use client::{CompletionClient, CompletionError};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
pub use types::CompletionRequest;
