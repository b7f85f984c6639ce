//! Progress notification port
//!
//! Defines the interface for reporting progress while a deliberation runs.

use mrce_domain::{Persona, RoundRecord, Stage};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer.
pub trait DeliberationProgress: Send + Sync {
    /// Called when a round begins
    fn on_round_start(&self, round: u32, max_rounds: u32);

    /// Called when the round enters a new stage
    fn on_stage(&self, round: u32, stage: Stage);

    /// Called when a single expert's gate check finishes
    fn on_gate_complete(&self, _persona: Persona, _eligible: bool) {}

    /// Called when a selected expert's answer arrives (or fails)
    fn on_candidate_complete(&self, _persona: Persona, _success: bool) {}

    /// Called after the round has been summarized
    fn on_round_complete(&self, record: &RoundRecord);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}
    fn on_stage(&self, _round: u32, _stage: Stage) {}
    fn on_round_complete(&self, _record: &RoundRecord) {}
}
