//! Candidate generation: ask each selected expert for its answer.

use crate::ports::progress::DeliberationProgress;
use crate::ports::reasoning_oracle::ReasoningOracle;
use crate::use_cases::shared::OracleClient;
use mrce_domain::{Candidate, Expert, GatedExpert, OracleReply, RoundAnomaly, RoundContext};
use tokio::task::JoinSet;
use tracing::warn;

const ANSWER_FIELDS: &[&str] = &["answer", "response", "content"];

pub struct GenerateCandidatesUseCase<O: ReasoningOracle + 'static> {
    client: OracleClient<O>,
}

impl<O: ReasoningOracle + 'static> GenerateCandidatesUseCase<O> {
    pub fn new(client: OracleClient<O>) -> Self {
        Self { client }
    }

    /// Collect one candidate per selected expert, in selection order.
    ///
    /// Experts whose call fails or comes back empty produce no candidate.
    pub async fn generate(
        &self,
        round: &RoundContext<'_>,
        selected: &[GatedExpert],
        progress: &dyn DeliberationProgress,
    ) -> (Vec<Candidate>, Vec<RoundAnomaly>) {
        let mut join_set = JoinSet::new();
        for (idx, gated) in selected.iter().enumerate() {
            let client = self.client.clone();
            let request = gated.expert.respond_request(round);
            join_set.spawn(async move { (idx, client.ask(&request).await) });
        }

        let mut answers: Vec<Option<String>> = vec![None; selected.len()];
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((idx, Ok(raw))) => {
                    let answer = extract_answer(&raw);
                    progress.on_candidate_complete(selected[idx].persona(), !answer.is_empty());
                    answers[idx] = Some(answer);
                }
                Ok((idx, Err(e))) => {
                    warn!("{} failed to answer: {}", selected[idx].persona(), e);
                    progress.on_candidate_complete(selected[idx].persona(), false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        let mut candidates = Vec::new();
        let mut anomalies = Vec::new();
        for (gated, answer) in selected.iter().zip(answers) {
            match answer.filter(|a| !a.is_empty()) {
                Some(answer) => {
                    candidates.push(Candidate::new(gated.persona(), answer, gated.confidence()));
                }
                None => anomalies.push(RoundAnomaly::CandidateFailed(gated.persona())),
            }
        }
        (candidates, anomalies)
    }
}

/// Expert answers are free text; a JSON wrapper with an answer field is unwrapped.
fn extract_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('{')
        && let OracleReply::Parsed(fields) = OracleReply::parse(trimmed)
        && let Some(answer) = fields.text(ANSWER_FIELDS)
    {
        return answer;
    }
    trimmed.to_string()
}
