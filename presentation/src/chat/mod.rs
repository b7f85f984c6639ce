//! Interactive chat module
//!
//! Provides a readline-based prompt that deliberates one question at a time.

mod repl;

pub use repl::{ChatRepl, ReplError, ReplInput};
