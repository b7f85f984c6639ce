//! Convergence policies.
//!
//! Detecting "irreducible truth or contradiction" is heuristic. The
//! orchestrator only sees the [`ConvergencePolicy`] trait, so a keyword
//! check can be swapped for an oracle-assisted one without touching the
//! round loop. False positives and negatives are expected; the round
//! budget is the only guaranteed terminator.

use crate::critique::score::{RoundScore, StopLabel};
use crate::judging::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

const AGREEMENT_PHRASES: &[&str] = &["irreducible truth", "all candidates agree", "consensus reached"];
const CONTRADICTION_PHRASES: &[&str] = &[
    "direct contradiction",
    "mutually exclusive",
    "unresolved contradiction",
];

/// Why a session converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceReason {
    IrreducibleTruth,
    Contradiction,
}

impl fmt::Display for ConvergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceReason::IrreducibleTruth => write!(f, "irreducible truth"),
            ConvergenceReason::Contradiction => write!(f, "contradiction"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceDecision {
    Continue,
    Converge(ConvergenceReason),
}

/// Decides after each judged round whether deliberation can stop early.
pub trait ConvergencePolicy: Send + Sync {
    fn evaluate(&self, summary: &str, verdict: &Verdict, score: &RoundScore) -> ConvergenceDecision;
}

/// Trusts the critic's stop label, then falls back to phrases in the
/// judge rationale.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopLabelConvergence;

impl ConvergencePolicy for StopLabelConvergence {
    fn evaluate(&self, _summary: &str, verdict: &Verdict, score: &RoundScore) -> ConvergenceDecision {
        match score.stop_label {
            StopLabel::IrreducibleTruth => {
                return ConvergenceDecision::Converge(ConvergenceReason::IrreducibleTruth);
            }
            StopLabel::Contradiction => {
                return ConvergenceDecision::Converge(ConvergenceReason::Contradiction);
            }
            StopLabel::Continue => {}
        }

        let rationale = verdict.rationale.to_lowercase();
        if AGREEMENT_PHRASES.iter().any(|p| rationale.contains(p)) {
            ConvergenceDecision::Converge(ConvergenceReason::IrreducibleTruth)
        } else if CONTRADICTION_PHRASES.iter().any(|p| rationale.contains(p)) {
            ConvergenceDecision::Converge(ConvergenceReason::Contradiction)
        } else {
            ConvergenceDecision::Continue
        }
    }
}

/// Runs until the round budget is spent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConverge;

impl ConvergencePolicy for NeverConverge {
    fn evaluate(&self, _summary: &str, _verdict: &Verdict, _score: &RoundScore) -> ConvergenceDecision {
        ConvergenceDecision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expert::Persona;
    use crate::judging::candidate::Candidate;

    fn verdict(rationale: &str) -> Verdict {
        let mut verdict = Verdict::single(&Candidate::new(Persona::Analyst, "a", 0.9));
        verdict.rationale = rationale.to_string();
        verdict
    }

    #[test]
    fn test_stop_label_wins() {
        let mut score = RoundScore::neutral();
        score.stop_label = StopLabel::Contradiction;
        assert_eq!(
            StopLabelConvergence.evaluate("", &verdict("fine"), &score),
            ConvergenceDecision::Converge(ConvergenceReason::Contradiction)
        );
    }

    #[test]
    fn test_keyword_fallback() {
        let score = RoundScore::neutral();
        assert_eq!(
            StopLabelConvergence.evaluate("", &verdict("All candidates agree on the bound."), &score),
            ConvergenceDecision::Converge(ConvergenceReason::IrreducibleTruth)
        );
        assert_eq!(
            StopLabelConvergence.evaluate("", &verdict("The two claims are mutually exclusive."), &score),
            ConvergenceDecision::Converge(ConvergenceReason::Contradiction)
        );
        assert_eq!(
            StopLabelConvergence.evaluate("", &verdict("Critic is more careful."), &score),
            ConvergenceDecision::Continue
        );
    }

    #[test]
    fn test_never_converge() {
        let mut score = RoundScore::neutral();
        score.stop_label = StopLabel::IrreducibleTruth;
        assert_eq!(
            NeverConverge.evaluate("", &verdict("irreducible truth"), &score),
            ConvergenceDecision::Continue
        );
    }
}
