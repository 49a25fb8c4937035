//! System prompt sent ahead of every user message.

/// Behavioral instructions for the assistant. Overridable via configuration.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, friendly, and safe AI assistant. \
Your goal is to provide accurate and constructive information. \
Always be respectful and avoid generating harmful content.";
