//! Per-round trace records.

use crate::critique::score::RoundScore;
use crate::deliberation::vibe::VibeLabel;
use crate::expert::{GateResult, Persona};
use crate::judging::candidate::Candidate;
use crate::judging::verdict::{Verdict, VerdictSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recovered, non-fatal events worth surfacing in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "persona")]
pub enum RoundAnomaly {
    /// Router failed; the default vibe was used
    DegradedRouting,
    GateFailed(Persona),
    NoQualifyingExperts,
    /// Selected expert produced no usable answer
    CandidateFailed(Persona),
    JudgeFallback,
    CritiqueUnavailable,
}

impl fmt::Display for RoundAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundAnomaly::DegradedRouting => write!(f, "degraded routing (default vibe used)"),
            RoundAnomaly::GateFailed(p) => write!(f, "gate failed for {}", p.display_name()),
            RoundAnomaly::NoQualifyingExperts => write!(f, "no expert qualified"),
            RoundAnomaly::CandidateFailed(p) => {
                write!(f, "{} produced no answer", p.display_name())
            }
            RoundAnomaly::JudgeFallback => write!(f, "judge fell back to heuristic ranking"),
            RoundAnomaly::CritiqueUnavailable => write!(f, "critique unavailable (neutral scores)"),
        }
    }
}

/// Everything that happened in one completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub vibe: VibeLabel,
    pub gates: Vec<GateResult>,
    /// Selected experts, in vibe order
    pub selected: Vec<Persona>,
    pub candidates: Vec<Candidate>,
    pub verdict: Verdict,
    /// `None` when critique was skipped (no consensus)
    pub score: Option<RoundScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<RoundAnomaly>,
    pub summary_entry: String,
}

impl RoundRecord {
    pub fn is_no_consensus(&self) -> bool {
        self.verdict.source == VerdictSource::NoConsensus
    }

    pub fn routing_degraded(&self) -> bool {
        self.anomalies.contains(&RoundAnomaly::DegradedRouting)
    }

    /// Answer text of the round's top-ranked candidate.
    pub fn top_answer(&self) -> Option<&str> {
        self.verdict.top_answer(&self.candidates)
    }
}

/// One-line condensed record appended to the running summary.
pub fn condense(round: u32, vibe: VibeLabel, verdict: &Verdict, score: Option<&RoundScore>) -> String {
    let Some(top) = verdict.top() else {
        return format!("Round {} | vibe={} | no consensus", round, vibe);
    };
    let mut entry = format!("Round {} | vibe={} | top={}", round, vibe, top.display_name());
    if let Some(score) = score {
        entry.push_str(&format!(
            " | route={:.2} quality={:.2} align={:.2} | stop={}",
            score.route_quality, score.candidate_quality, score.goal_alignment, score.stop_label
        ));
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judging::verdict::NoConsensusReason;

    #[test]
    fn test_condense_with_score() {
        let verdict = Verdict::single(&Candidate::new(Persona::SystemsEngineer, "plan", 0.8));
        let entry = condense(2, VibeLabel::Plan, &verdict, Some(&RoundScore::neutral()));
        assert_eq!(
            entry,
            "Round 2 | vibe=plan | top=Systems Engineer | route=0.50 quality=0.50 align=0.50 | stop=continue"
        );
    }

    #[test]
    fn test_condense_no_consensus() {
        let entry = condense(
            1,
            VibeLabel::Analytic,
            &Verdict::no_consensus(NoConsensusReason::NoAnswers),
            None,
        );
        assert_eq!(entry, "Round 1 | vibe=analytic | no consensus");
    }

    #[test]
    fn test_anomaly_display() {
        assert_eq!(
            RoundAnomaly::GateFailed(Persona::Critic).to_string(),
            "gate failed for Critic"
        );
    }
}
