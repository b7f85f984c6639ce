//! Hint snapshot persistence

pub mod file_store;

pub use file_store::{HintFileStore, HintStoreError};
