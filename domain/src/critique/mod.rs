//! Meta-critique: round scores, stop labels and coaching hints.

pub mod score;

pub use score::{LOW_QUALITY_THRESHOLD, RoundScore, StopLabel, critique_request};
