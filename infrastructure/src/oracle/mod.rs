//! Reasoning oracle adapter
//!
//! [`OpenAiCompatibleOracle`] implements the application's
//! `ReasoningOracle` port over any OpenAI-compatible chat endpoint.

pub mod instructions;
pub mod openai;
pub mod settings;

pub use openai::OpenAiCompatibleOracle;
pub use settings::OracleSettings;
