//! Ports: interfaces the application layer needs from the outside.

pub mod conversation_logger;
pub mod progress;
pub mod reasoning_oracle;
