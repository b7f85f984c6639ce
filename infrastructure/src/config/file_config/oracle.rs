//! Oracle configuration from TOML (`[oracle]` section)

use serde::{Deserialize, Serialize};

/// Model and endpoint used by the OpenAI-compatible adapter
///
/// `model` is `provider/model`, e.g. `openai/gpt-4o-mini` or
/// `ollama_chat/llama3`. Environment variables override every field at
/// settings resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    pub model: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            api_base: None,
            api_key: None,
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}
