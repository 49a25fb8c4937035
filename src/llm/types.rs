//! Request envelope and response shapes for OpenAI-style chat completions.

use serde::{Deserialize, Serialize};

/// One completion call's worth of input. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Wire body for `model`.
    pub fn to_body(&self, model: &str) -> ChatCompletionBody {
        ChatCompletionBody {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.user_prompt.clone(),
                },
            ],
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Only the fields we read; everything else in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice, if present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        let content = self.choices.first()?.message.as_ref()?.content.as_deref()?;
        let trimmed = content.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(temperature: Option<f32>) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "be nice".to_string(),
            user_prompt: "hello".to_string(),
            max_output_tokens: 500,
            temperature,
        }
    }

    #[test]
    fn body_has_system_then_user_message() {
        let body = serde_json::to_value(request(Some(0.5)).to_body("m1")).unwrap();
        assert_eq!(body["model"], "m1");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be nice");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn temperature_is_omitted_when_unset() {
        let body = serde_json::to_value(request(None).to_body("m1")).unwrap();
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn first_text_trims_content() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Paris.\n"}}]
        }))
        .unwrap();
        assert_eq!(resp.first_text(), Some("Paris."));
    }

    #[test]
    fn first_text_rejects_missing_or_blank_content() {
        let cases = [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": "   "}}]}),
        ];
        for case in cases {
            let resp: ChatCompletionResponse = serde_json::from_value(case.clone()).unwrap();
            assert!(resp.first_text().is_none(), "expected none for {}", case);
        }
    }
}
