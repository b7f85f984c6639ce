//! Orchestrator state: the only entity that lives across rounds.

use crate::core::error::DomainError;
use crate::critique::score::RoundScore;
use crate::expert::Persona;
use crate::round::snapshot::{HintSnapshot, merge_hint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-round state owned by the orchestrator.
///
/// Stages read it; only the orchestrator mutates it, once per round, with
/// the critic's deltas and the round's summary entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub round: u32,
    pub summary: String,
    pub router_guidance: String,
    pub expert_hints: BTreeMap<String, String>,
    pub terminated: bool,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from persisted hints. The round counter starts at 0.
    pub fn from_snapshot(snapshot: HintSnapshot) -> Self {
        let snapshot = snapshot.normalized();
        Self {
            router_guidance: snapshot.router_guidance,
            expert_hints: snapshot.expert_hints,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> HintSnapshot {
        HintSnapshot {
            router_guidance: self.router_guidance.clone(),
            expert_hints: self.expert_hints.clone(),
        }
    }

    pub fn hint_for(&self, persona: Persona) -> &str {
        self.expert_hints
            .get(persona.as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Merge a round's critique into router guidance and expert hints.
    ///
    /// Personas without a new hint keep their previous one.
    pub fn apply_score(&mut self, score: &RoundScore) {
        self.router_guidance = merge_hint(&self.router_guidance, &score.router_hint);
        for (persona, hint) in &score.expert_hints {
            let previous = self.hint_for(*persona).to_string();
            let merged = merge_hint(&previous, hint);
            if !merged.is_empty() {
                self.expert_hints.insert(persona.as_str().to_string(), merged);
            }
        }
    }

    pub fn append_summary(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        if !self.summary.is_empty() {
            self.summary.push('\n');
        }
        self.summary.push_str(entry);
    }

    /// Record round `round` as completed. Rounds must complete in order.
    pub fn complete_round(&mut self, round: u32) -> Result<(), DomainError> {
        let expected = self.round + 1;
        if round != expected {
            return Err(DomainError::RoundOutOfSequence {
                expected,
                found: round,
            });
        }
        self.round = round;
        Ok(())
    }

    /// Drop all guidance. The only way hints are ever lost.
    pub fn reset_hints(&mut self) {
        self.router_guidance.clear();
        self.expert_hints.clear();
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }
}
