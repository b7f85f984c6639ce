//! Oracle endpoint settings resolved from config and environment.
//!
//! Environment variables win over the `[oracle]` config section:
//! `MRCE_LM` (provider/model), `MRCE_API_BASE`, `MRCE_API_KEY`, then the
//! provider's own key variable.

use crate::config::FileOracleConfig;
use mrce_application::OracleError;

/// Everything the HTTP adapter needs to reach a chat-completion endpoint.
#[derive(Clone, PartialEq)]
pub struct OracleSettings {
    /// Full `provider/model` identifier
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// Keeps the key out of logs.
impl std::fmt::Debug for OracleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleSettings")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OracleSettings {
    /// Resolve settings against the process environment.
    pub fn from_env(config: &FileOracleConfig) -> Result<Self, OracleError> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an injectable variable lookup.
    pub fn resolve(
        config: &FileOracleConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, OracleError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let model = var("MRCE_LM").unwrap_or_else(|| config.model.clone());
        let provider = provider_of(&model);

        let api_base = var("MRCE_API_BASE")
            .or_else(|| config.api_base.clone())
            .or_else(|| default_api_base(provider).map(str::to_string))
            .ok_or_else(|| {
                OracleError::Configuration(format!(
                    "{}: no default endpoint for provider '{}'. Set MRCE_API_BASE or oracle.api_base.",
                    model, provider
                ))
            })?;

        let api_key = var("MRCE_API_KEY")
            .or_else(|| config.api_key.clone().filter(|k| !k.trim().is_empty()))
            .or_else(|| provider_key_var(provider).and_then(&var));

        if provider_requires_key(provider) && api_key.is_none() {
            return Err(OracleError::Configuration(format!(
                "{}: missing API key. Set MRCE_API_KEY or the provider key env var.",
                model
            )));
        }

        Ok(Self {
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn provider(&self) -> &str {
        provider_of(&self.model)
    }

    /// Model name as the endpoint expects it (without the provider prefix)
    pub fn model_name(&self) -> &str {
        self.model
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.model)
    }
}

fn provider_of(model: &str) -> &str {
    model.split_once('/').map(|(p, _)| p).unwrap_or(model)
}

fn provider_requires_key(provider: &str) -> bool {
    provider != "ollama_chat"
}

fn provider_key_var(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "gemini" => Some("GEMINI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "databricks" => Some("DATABRICKS_API_KEY"),
        _ => None,
    }
}

/// OpenAI-compatible base URL per provider. Databricks is workspace-specific.
fn default_api_base(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("https://api.openai.com/v1"),
        "anthropic" => Some("https://api.anthropic.com/v1"),
        "gemini" => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama_chat" => Some("http://localhost:11434/v1"),
        _ => None,
    }
}
