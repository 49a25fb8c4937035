//! Completion client: one prompt in, one trimmed reply or one classified
//! failure out.
//!
//! Exactly one outbound request per call. No retries, no fallback model, no
//! caching between calls.

use super::transport::{HttpTransport, TransportError, TransportRequest};
use super::types::{ChatCompletionResponse, CompletionRequest};
use crate::config::Config;
use crate::error::ErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Longest slice of an upstream error body carried into a failure detail.
const BODY_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0}")]
    Configuration(String),

    #[error("API error ({status}): {}", excerpt(.body))]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    MalformedResponse(String),
}

impl CompletionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompletionError::Configuration(_) => ErrorKind::Configuration,
            CompletionError::Status { .. } | CompletionError::Transport(_) => {
                ErrorKind::TransportOrServer
            }
            CompletionError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    /// HTTP status received from the provider, if one was.
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

pub struct CompletionClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: Option<f32>,
    extra_headers: Vec<(String, String)>,
}

impl CompletionClient {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            extra_headers: config.extra_headers.clone(),
        }
    }

    /// Fresh request envelope for one user prompt.
    pub fn build_request(&self, user_prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            user_prompt: user_prompt.to_string(),
            max_output_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Send `user_prompt` to the provider and return the trimmed reply.
    pub async fn complete(&self, user_prompt: &str) -> Result<String, CompletionError> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => {
                log::warn!("[LLM] No API key configured, skipping request");
                return Err(CompletionError::Configuration(
                    "API key not configured".to_string(),
                ));
            }
        };

        let request = self.build_request(user_prompt);
        let body = serde_json::to_value(request.to_body(&self.model))
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let mut headers = vec![("Authorization".to_string(), format!("Bearer {}", api_key))];
        headers.extend(self.extra_headers.iter().cloned());

        log::info!("[LLM] Model: {}", self.model);
        let start = std::time::Instant::now();

        let response = match self
            .transport
            .post_json(TransportRequest {
                url: self.endpoint.clone(),
                headers,
                body,
            })
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let err = self.mask(CompletionError::Transport(e));
                log::error!("[LLM] HTTP request failed: {}", err);
                return Err(err);
            }
        };

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());

        if !response.is_success() {
            let err = self.mask(CompletionError::Status {
                status: response.status,
                body: response.body,
            });
            log::error!("[LLM] {}", err);
            return Err(err);
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body).map_err(|e| {
            log::warn!("[LLM] Response body is not a chat completion: {}", e);
            CompletionError::MalformedResponse(format!("Unreadable response body: {}", e))
        })?;

        match parsed.first_text() {
            Some(text) => {
                log::info!("[LLM] Reply: {} chars", text.len());
                Ok(text.to_string())
            }
            None => {
                log::warn!("[LLM] Response carried no message content");
                Err(CompletionError::MalformedResponse(
                    "No response content from provider".to_string(),
                ))
            }
        }
    }

    /// Strip the credential from anything that may be shown to a caller.
    fn mask(&self, err: CompletionError) -> CompletionError {
        let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return err;
        };
        match err {
            CompletionError::Status { status, body } if body.contains(key) => {
                CompletionError::Status {
                    status,
                    body: body.replace(key, "***"),
                }
            }
            CompletionError::Transport(e) if e.to_string().contains(key) => {
                CompletionError::Transport(TransportError::Other(
                    e.to_string().replace(key, "***"),
                ))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            CompletionError::Configuration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CompletionError::Status {
                status: 500,
                body: String::new()
            }
            .kind(),
            ErrorKind::TransportOrServer
        );
        assert_eq!(
            CompletionError::Transport(TransportError::Connect("refused".into())).kind(),
            ErrorKind::TransportOrServer
        );
        assert_eq!(
            CompletionError::MalformedResponse("x".into()).kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[test]
    fn status_message_carries_code_and_body() {
        let err = CompletionError::Status {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API error (503): overloaded");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn long_bodies_are_cut_to_an_excerpt() {
        let body = "é".repeat(BODY_EXCERPT_CHARS + 10);
        let shown = excerpt(&body);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), BODY_EXCERPT_CHARS + 3);
    }
}
