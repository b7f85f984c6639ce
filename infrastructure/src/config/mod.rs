//! Configuration loading
//!
//! [`ConfigLoader`] merges defaults, TOML files and environment variables
//! into a [`FileConfig`].

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDeliberationConfig, FileOracleConfig,
    FileOutputConfig,
};
pub use loader::ConfigLoader;
