//! Known chat-completion providers: static registry of OpenAI-compatible
//! endpoints.
//!
//! Every preset speaks the same `choices[0].message.content` wire format, so
//! switching provider is purely a matter of endpoint, model and key.

/// Metadata for a supported provider.
#[derive(Debug, Clone)]
pub struct ProviderPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub endpoint: &'static str,
    pub default_model: &'static str,
    /// Environment variable holding this provider's API key.
    pub env_key: &'static str,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// Extra request headers the provider uses for attribution.
    pub extra_headers: &'static [(&'static str, &'static str)],
}

static PROVIDERS: &[ProviderPreset] = &[
    ProviderPreset {
        id: "openrouter",
        name: "OpenRouter",
        endpoint: "https://openrouter.ai/api/v1/chat/completions",
        default_model: "deepseek/deepseek-chat",
        env_key: "OPENROUTER_API_KEY",
        max_tokens: 500,
        temperature: Some(0.7),
        extra_headers: &[
            ("HTTP-Referer", "http://localhost:3000"),
            ("X-Title", "AI Chat Moderation App"),
        ],
    },
    ProviderPreset {
        id: "groq",
        name: "Groq",
        endpoint: "https://api.groq.com/openai/v1/chat/completions",
        default_model: "llama-3.1-8b-instant",
        env_key: "GROQ_API_KEY",
        max_tokens: 500,
        temperature: Some(0.7),
        extra_headers: &[],
    },
    ProviderPreset {
        id: "deepseek",
        name: "DeepSeek",
        endpoint: "https://api.deepseek.com/chat/completions",
        default_model: "deepseek-chat",
        env_key: "DEEPSEEK_API_KEY",
        max_tokens: 512,
        temperature: None,
        extra_headers: &[],
    },
];

/// Return all known providers.
pub fn all_providers() -> &'static [ProviderPreset] {
    PROVIDERS
}

/// The provider used when none is configured.
pub fn default_provider() -> &'static ProviderPreset {
    &PROVIDERS[0] // openrouter
}

/// Look up a provider by ID.
pub fn find_provider(id: &str) -> Option<&'static ProviderPreset> {
    PROVIDERS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}
