//! MetaCritic: score a judged round and emit coaching hints.

use crate::ports::reasoning_oracle::ReasoningOracle;
use crate::use_cases::shared::OracleClient;
use mrce_domain::{Persona, Query, RoundScore, VibeLabel, critique_request};
use tracing::{debug, warn};

/// Critique inputs for one judged round.
#[derive(Debug, Clone, Copy)]
pub struct CritiqueInput<'a> {
    pub query: &'a Query,
    pub vibe: VibeLabel,
    /// Top-ranked answer
    pub answer: &'a str,
    pub rationale: &'a str,
    pub summary: &'a str,
    pub participants: &'a [Persona],
}

/// Critique result. `available` is false when neutral scores were substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct CritiqueOutcome {
    pub score: RoundScore,
    pub available: bool,
}

pub struct MetaCriticUseCase<O: ReasoningOracle + 'static> {
    client: OracleClient<O>,
}

impl<O: ReasoningOracle + 'static> MetaCriticUseCase<O> {
    pub fn new(client: OracleClient<O>) -> Self {
        Self { client }
    }

    pub async fn evaluate(&self, input: CritiqueInput<'_>) -> CritiqueOutcome {
        let request = critique_request(
            input.query,
            input.vibe,
            input.answer,
            input.rationale,
            input.summary,
            input.participants,
        );

        match self.client.ask_parsed(&request).await {
            Ok(reply) if reply.is_parsed() => {
                let score = RoundScore::from_reply(&reply, input.participants);
                debug!(
                    "Critique: route={:.2} quality={:.2} align={:.2} stop={}",
                    score.route_quality, score.candidate_quality, score.goal_alignment, score.stop_label
                );
                CritiqueOutcome {
                    score,
                    available: true,
                }
            }
            Ok(_) => {
                warn!("Critique reply unparseable, using neutral scores");
                neutral()
            }
            Err(e) => {
                warn!("Critique failed ({}), using neutral scores", e);
                neutral()
            }
        }
    }
}

fn neutral() -> CritiqueOutcome {
    CritiqueOutcome {
        score: RoundScore::neutral(),
        available: false,
    }
}
