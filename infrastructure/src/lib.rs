//! Infrastructure layer for mrce
//!
//! Adapters for the application ports and the outside world:
//! - [`oracle`]: OpenAI-compatible HTTP adapter for `ReasoningOracle`
//! - [`config`]: layered TOML/env configuration
//! - [`hints`]: hint snapshot persistence
//! - [`logging`]: JSONL transcript writer for `ConversationLogger`

pub mod config;
pub mod hints;
pub mod logging;
pub mod oracle;

pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use hints::{HintFileStore, HintStoreError};
pub use logging::JsonlTranscriptLogger;
pub use oracle::{OpenAiCompatibleOracle, OracleSettings};
