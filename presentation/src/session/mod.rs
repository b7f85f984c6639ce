//! Query execution shared by single-shot and interactive modes

pub mod runner;

pub use runner::{QueryRunner, SessionError};
