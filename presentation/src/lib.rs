//! Presentation layer for mrce
//!
//! This crate contains the CLI definition, session settings, the query
//! runner, console formatting, progress reporting, and the interactive
//! prompt.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplError};
pub use cli::commands::{Cli, OutputFormat};
pub use config::SessionSettings;
pub use output::console::{ConsoleFormatter, configure_color};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use session::{QueryRunner, SessionError};
