//! Process configuration. Read once at startup, immutable afterwards.
//!
//! Values come from an optional `.env` file plus the process environment.
//! Core logic never reads the environment itself; it receives a [`Config`].

use crate::llm::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::llm::providers::{self, ProviderPreset};
use crate::safety::{denylist, Denylist, DenylistError};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown provider '{0}' (available: {ids})", ids = provider_ids())]
    UnknownProvider(String),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },

    #[error(transparent)]
    Denylist(#[from] DenylistError),
}

#[derive(Clone)]
pub struct Config {
    pub provider: &'static ProviderPreset,
    /// `None` means every turn fails with a configuration error.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub request_timeout: Duration,
    pub extra_headers: Vec<(String, String)>,
    pub denylist: Denylist,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider.id)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|k| format!("<{} chars>", k.len())),
            )
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .field("denylist", &self.denylist.terms())
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Config {
    /// Defaults for `preset`, without any API key.
    pub fn for_provider(preset: &'static ProviderPreset) -> Self {
        Self {
            provider: preset,
            api_key: None,
            endpoint: preset.endpoint.to_string(),
            model: preset.default_model.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: preset.max_tokens,
            temperature: preset.temperature,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extra_headers: preset
                .extra_headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            denylist: Denylist::default(),
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&[])
    }

    /// Like [`Config::from_env`], but `overrides` win over the environment.
    /// Used for command-line flags.
    pub fn from_env_with(overrides: &[(&str, String)]) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[CONFIG] Loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env: {}", e),
        }
        let lookup = |name: &str| {
            overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .or_else(|| std::env::var(name).ok())
        };
        let default_denylist = denylist::default_denylist_path().filter(|p| p.is_file());
        Self::from_sources(lookup, default_denylist)
    }

    /// Build a config from any variable source. Empty values count as unset.
    /// Never touches the filesystem unless `MODCHAT_DENYLIST_FILE` is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, None)
    }

    /// `default_denylist` is loaded when `MODCHAT_DENYLIST_FILE` is unset.
    fn from_sources<F>(lookup: F, default_denylist: Option<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let preset = match var("MODCHAT_PROVIDER") {
            Some(id) => providers::find_provider(&id).ok_or(ConfigError::UnknownProvider(id))?,
            None => providers::default_provider(),
        };
        let mut config = Self::for_provider(preset);

        config.api_key = var("MODCHAT_API_KEY").or_else(|| var(preset.env_key));
        match &config.api_key {
            Some(key) => log::info!("[CONFIG] API key found ({} chars)", key.len()),
            None => log::warn!(
                "[CONFIG] No API key set (MODCHAT_API_KEY or {})",
                preset.env_key
            ),
        }

        if let Some(endpoint) = var("MODCHAT_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(model) = var("MODCHAT_MODEL") {
            config.model = model;
        }
        if let Some(prompt) = var("MODCHAT_SYSTEM_PROMPT") {
            config.system_prompt = prompt;
        }
        if let Some(raw) = var("MODCHAT_MAX_TOKENS") {
            config.max_tokens = parse_number("MODCHAT_MAX_TOKENS", &raw)?;
            if config.max_tokens == 0 {
                return Err(invalid("MODCHAT_MAX_TOKENS", "must be at least 1"));
            }
        }
        if let Some(raw) = var("MODCHAT_TEMPERATURE") {
            let t: f32 = parse_number("MODCHAT_TEMPERATURE", &raw)?;
            if !(0.0..=1.0).contains(&t) {
                return Err(invalid("MODCHAT_TEMPERATURE", "must be between 0 and 1"));
            }
            config.temperature = Some(t);
        }
        if let Some(raw) = var("MODCHAT_TIMEOUT_SECS") {
            let secs: u64 = parse_number("MODCHAT_TIMEOUT_SECS", &raw)?;
            if secs == 0 {
                return Err(invalid("MODCHAT_TIMEOUT_SECS", "must be at least 1"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = var("PORT") {
            config.port = parse_number("PORT", &raw)?;
        }
        config.static_dir = var("MODCHAT_STATIC_DIR").map(PathBuf::from);

        config.denylist = match var("MODCHAT_DENYLIST_FILE") {
            Some(path) => Denylist::from_file(&PathBuf::from(path))?,
            None => match default_denylist {
                Some(path) => Denylist::from_file(&path)?,
                None => Denylist::default(),
            },
        };

        log::info!(
            "[CONFIG] Provider: {} ({}), model {}, {} denylist terms",
            preset.name,
            config.endpoint,
            config.model,
            config.denylist.len()
        );
        Ok(config)
    }
}

fn provider_ids() -> String {
    providers::all_providers()
        .iter()
        .map(|p| p.id)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| invalid(name, &format!("'{}': {}", raw, e)))
}

fn invalid(name: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_openrouter_without_key() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.provider.id, "openrouter");
        assert!(!config.has_api_key());
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.extra_headers.len(), 2);
    }

    #[test]
    fn reads_provider_specific_key() {
        let config = Config::from_lookup(lookup(&[
            ("MODCHAT_PROVIDER", "groq"),
            ("GROQ_API_KEY", "gsk-test"),
        ]))
        .unwrap();
        assert_eq!(config.provider.id, "groq");
        assert_eq!(config.api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn generic_key_wins_and_empty_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[
            ("MODCHAT_API_KEY", "generic"),
            ("OPENROUTER_API_KEY", "specific"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("generic"));

        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("MODCHAT_ENDPOINT", "http://localhost:9/v1/chat/completions"),
            ("MODCHAT_MODEL", "tiny"),
            ("MODCHAT_MAX_TOKENS", "64"),
            ("MODCHAT_TEMPERATURE", "0.2"),
            ("MODCHAT_TIMEOUT_SECS", "5"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9/v1/chat/completions");
        assert_eq!(config.model, "tiny");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("MODCHAT_PROVIDER", "nope")])),
            Err(ConfigError::UnknownProvider(_))
        ));
        let err = Config::from_lookup(lookup(&[("MODCHAT_PROVIDER", "nope")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown provider 'nope' (available: openrouter, groq, deepseek)"
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[("MODCHAT_TEMPERATURE", "1.5")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("MODCHAT_MAX_TOKENS", "lots")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("MODCHAT_DENYLIST_FILE", "/definitely/missing.txt")])),
            Err(ConfigError::Denylist(_))
        ));
    }

    #[test]
    fn debug_output_masks_key() {
        let config = Config::for_provider(providers::default_provider()).with_api_key("sk-secret-123");
        let shown = format!("{:?}", config);
        assert!(!shown.contains("sk-secret-123"));
        assert!(shown.contains("<13 chars>"));
    }

    #[test]
    fn default_denylist_applies_only_when_no_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("denylist.txt");
        std::fs::write(&default_path, "spam\n").unwrap();
        let named = dir.path().join("named.txt");
        std::fs::write(&named, "scam\n").unwrap();

        let config = Config::from_sources(lookup(&[]), Some(default_path.clone())).unwrap();
        assert_eq!(config.denylist.terms(), &["spam".to_string()]);

        let named = named.display().to_string();
        let config = Config::from_sources(
            lookup(&[("MODCHAT_DENYLIST_FILE", named.as_str())]),
            Some(default_path),
        )
        .unwrap();
        assert_eq!(config.denylist.terms(), &["scam".to_string()]);
    }

    #[test]
    fn lookup_without_file_uses_built_in_terms() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.denylist, Denylist::default());
    }
}
