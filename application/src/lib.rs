//! Application layer for mrce
//!
//! This crate contains the round-stage use cases, the orchestrator, port
//! definitions, and deliberation parameters. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, ParamsError};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{DeliberationProgress, NoProgress},
    reasoning_oracle::{OracleError, ReasoningOracle},
};
pub use use_cases::run_deliberation::{
    DeliberationOutcome, NO_CONSENSUS_ANSWER, RunDeliberationError, RunDeliberationInput,
    RunDeliberationUseCase,
};
pub use use_cases::shared::OracleClient;
