//! Judge output.

use crate::core::error::DomainError;
use crate::expert::Persona;
use crate::judging::candidate::Candidate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const SINGLE_CANDIDATE_RATIONALE: &str = "single candidate, no comparison performed.";

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Exactly one candidate; no comparison call issued
    SingleCandidate,
    /// Parsed from the oracle's comparison reply
    Oracle,
    /// Heuristic ranking after an unusable comparison reply
    Fallback,
    /// No candidate answer to rank this round
    NoConsensus,
}

/// Why a round produced no candidate to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoConsensusReason {
    /// Every expert failed the gate
    NoQualifyingExperts,
    /// Experts were selected but none returned a usable answer
    NoAnswers,
}

impl NoConsensusReason {
    fn rationale(self) -> &'static str {
        match self {
            NoConsensusReason::NoQualifyingExperts => {
                "no consensus possible: no expert qualified this round."
            }
            NoConsensusReason::NoAnswers => {
                "no consensus possible: no selected expert produced an answer this round."
            }
        }
    }
}

/// Ranked candidate identities plus a rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub ranking: Vec<Persona>,
    pub rationale: String,
    pub source: VerdictSource,
    /// Request payload sent to the comparison capability, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Verdict {
    pub fn single(candidate: &Candidate) -> Self {
        Self {
            ranking: vec![candidate.persona],
            rationale: SINGLE_CANDIDATE_RATIONALE.to_string(),
            source: VerdictSource::SingleCandidate,
            payload: None,
        }
    }

    pub fn no_consensus(reason: NoConsensusReason) -> Self {
        Self {
            ranking: Vec::new(),
            rationale: reason.rationale().to_string(),
            source: VerdictSource::NoConsensus,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Top-ranked persona, if any.
    pub fn top(&self) -> Option<Persona> {
        self.ranking.first().copied()
    }

    pub fn is_fallback(&self) -> bool {
        self.source == VerdictSource::Fallback
    }

    /// Check that the ranking only names this round's candidates, once each.
    pub fn validate_against(&self, candidates: &[Candidate]) -> Result<(), DomainError> {
        let known: HashSet<Persona> = candidates.iter().map(|c| c.persona).collect();
        let mut seen = HashSet::new();
        for persona in &self.ranking {
            if !known.contains(persona) {
                return Err(DomainError::UnknownRankedCandidate(persona.to_string()));
            }
            if !seen.insert(*persona) {
                return Err(DomainError::DuplicateRankedCandidate(persona.to_string()));
            }
        }
        Ok(())
    }

    /// Answer text of the top-ranked candidate.
    pub fn top_answer<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a str> {
        let top = self.top()?;
        candidates
            .iter()
            .find(|c| c.persona == top)
            .map(|c| c.answer.as_str())
    }
}
