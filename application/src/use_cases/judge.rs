//! Judge: rank a round's candidates into a verdict.
//!
//! One candidate needs no comparison. Two or more go to the oracle's
//! comparison capability; when its reply yields no usable ranking (error,
//! timeout, renamed fields) the heuristic fallback ranks them instead.

use crate::ports::reasoning_oracle::ReasoningOracle;
use crate::use_cases::shared::OracleClient;
use mrce_domain::{
    Candidate, DomainError, FALLBACK_RATIONALE, Query, Verdict, VerdictSource, comparison_request,
    fallback_ranking, resolve_ranking,
};
use tracing::{debug, warn};

const DEFAULT_ORACLE_RATIONALE: &str = "ranked by structured comparison.";

pub struct JudgeUseCase<O: ReasoningOracle + 'static> {
    client: OracleClient<O>,
}

impl<O: ReasoningOracle + 'static> JudgeUseCase<O> {
    pub fn new(client: OracleClient<O>) -> Self {
        Self { client }
    }

    /// Rank `candidates`. Fails only when there is nothing to rank.
    pub async fn rank(
        &self,
        query: &Query,
        candidates: &[Candidate],
        keep_payload: bool,
    ) -> Result<Verdict, DomainError> {
        match candidates {
            [] => Err(DomainError::NoCandidates),
            [only] => {
                debug!("Single candidate from {}, skipping comparison", only.persona);
                Ok(Verdict::single(only))
            }
            _ => Ok(self.compare(query, candidates, keep_payload).await),
        }
    }

    async fn compare(&self, query: &Query, candidates: &[Candidate], keep_payload: bool) -> Verdict {
        let request = comparison_request(query, candidates);
        let payload = keep_payload.then(|| request.payload());

        let resolved = match self.client.ask_parsed(&request).await {
            Ok(reply) => resolve_ranking(&reply, candidates),
            Err(_) => None,
        };

        let verdict = match resolved {
            Some(resolved) => Verdict {
                ranking: resolved.ranking,
                rationale: resolved
                    .rationale
                    .unwrap_or_else(|| DEFAULT_ORACLE_RATIONALE.to_string()),
                source: VerdictSource::Oracle,
                payload: None,
            },
            None => {
                warn!("Judge fallback: structured comparison unavailable");
                Verdict {
                    ranking: fallback_ranking(candidates),
                    rationale: FALLBACK_RATIONALE.to_string(),
                    source: VerdictSource::Fallback,
                    payload: None,
                }
            }
        };
        verdict.with_payload(payload)
    }
}
