//! Reasoning oracle port
//!
//! Defines the interface for the external language-model call behind every
//! stage of a round.

use async_trait::async_trait;
use mrce_domain::OracleRequest;
use thiserror::Error;

/// Errors that can occur while invoking the oracle
///
/// None of these is fatal to a session: each stage has a fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Empty reply")]
    EmptyReply,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stateless request/response access to the reasoning oracle.
///
/// Implementations (adapters) live in the infrastructure layer. They return
/// the raw reply text; parsing it is the caller's job.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    async fn invoke(&self, request: &OracleRequest) -> Result<String, OracleError>;

    /// Identifier shown in logs and transcripts
    fn name(&self) -> String {
        "oracle".to_string()
    }
}
