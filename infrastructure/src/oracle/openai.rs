//! OpenAI-compatible chat-completion adapter for the reasoning oracle.

use super::instructions::system_message;
use super::settings::OracleSettings;
use async_trait::async_trait;
use mrce_application::{OracleError, ReasoningOracle};
use mrce_domain::OracleRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// One chat-completion call per oracle invocation.
///
/// The system message carries the shared rules plus the capability's task;
/// the user message is the request serialized as JSON. The reply text is
/// returned untouched.
pub struct OpenAiCompatibleOracle {
    settings: OracleSettings,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleOracle {
    pub fn new(settings: OracleSettings) -> Self {
        Self {
            settings,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.api_base)
    }

    fn build_body(&self, request: &OracleRequest) -> ChatRequest {
        ChatRequest {
            model: self.settings.model_name().to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_message(request.capability),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.payload().to_string(),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else if err.is_connect() {
        OracleError::ConnectionError(err.to_string())
    } else {
        OracleError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl ReasoningOracle for OpenAiCompatibleOracle {
    async fn invoke(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = self.build_body(request);
        debug!(
            "POST {} ({}, model {})",
            self.endpoint(),
            request.capability,
            body.model
        );

        let mut http_req = self.http_client.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.settings.api_key {
            http_req = http_req.bearer_auth(key);
        }

        let response = http_req.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(OracleError::HttpStatus {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::RequestFailed(format!("Malformed completion: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OracleError::EmptyReply)
    }

    fn name(&self) -> String {
        self.settings.model.clone()
    }
}
