//! Application configuration

pub mod deliberation_params;

pub use deliberation_params::{DeliberationParams, ParamsError};
