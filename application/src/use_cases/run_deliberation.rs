//! Run Deliberation use case
//!
//! Drives the round loop:
//! ROUTING -> SCHEDULING -> JUDGING -> CRITIQUING -> SUMMARIZING, then
//! either CONTINUE or TERMINATED. Rounds run strictly one after another;
//! only gate checks and candidate generation fan out within a round.

use crate::config::{DeliberationParams, ParamsError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::progress::{DeliberationProgress, NoProgress};
use crate::ports::reasoning_oracle::ReasoningOracle;
use crate::use_cases::generate_candidates::GenerateCandidatesUseCase;
use crate::use_cases::judge::JudgeUseCase;
use crate::use_cases::meta_critic::{CritiqueInput, MetaCriticUseCase};
use crate::use_cases::route_query::RouterUseCase;
use crate::use_cases::schedule_experts::ExpertSchedulerUseCase;
use crate::use_cases::shared::{OracleClient, is_cancelled};
use mrce_domain::{
    ConvergenceDecision, ConvergencePolicy, DomainError, ExpertDescriptor, HintSnapshot,
    NoConsensusReason, OrchestratorState, Persona, Query, RoundAnomaly, RoundContext, RoundRecord, RoundScore, Stage,
    StopLabelConvergence, Termination, Verdict, VibeLabel, condense, ensure_no_orphans,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Answer reported when no round produced a verdict.
pub const NO_CONSENSUS_ANSWER: &str = "no consensus possible";

/// Errors that abort a deliberation
///
/// Oracle failures never appear here; every stage recovers from them.
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] DomainError),
}

impl RunDeliberationError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, RunDeliberationError::InvariantViolation(_))
    }
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    pub query: Query,
    pub params: DeliberationParams,
    /// Hints restored from an earlier session
    pub prior: Option<HintSnapshot>,
}

impl RunDeliberationInput {
    pub fn new(query: Query, params: DeliberationParams) -> Self {
        Self {
            query,
            params,
            prior: None,
        }
    }

    pub fn with_prior(mut self, prior: Option<HintSnapshot>) -> Self {
        self.prior = prior;
        self
    }
}

/// Result of a finished (or cancelled) deliberation.
#[derive(Debug, Clone, Serialize)]
pub struct DeliberationOutcome {
    /// Top-ranked answer of the last round that produced a verdict
    pub answer: String,
    pub rationale: String,
    pub final_vibe: Option<VibeLabel>,
    pub summary: String,
    pub trace: Vec<RoundRecord>,
    /// Hints to persist for the next session
    pub snapshot: HintSnapshot,
    pub state: OrchestratorState,
    pub termination: Termination,
}

impl DeliberationOutcome {
    pub fn rounds(&self) -> u32 {
        self.state.round
    }
}

/// What one round produced before summarizing.
struct RoundResult {
    candidates: Vec<mrce_domain::Candidate>,
    verdict: Verdict,
    score: Option<RoundScore>,
}

/// Use case for running a multi-round deliberation
pub struct RunDeliberationUseCase<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    policy: Arc<dyn ConvergencePolicy>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl<O: ReasoningOracle + 'static> RunDeliberationUseCase<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            policy: Arc::new(StopLabelConvergence),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn ConvergencePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDeliberationInput,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        let RunDeliberationInput {
            query,
            params,
            prior,
        } = input;
        params.validate()?;

        let client = OracleClient::new(Arc::clone(&self.oracle))
            .with_timeout(params.oracle_timeout)
            .with_logger(Arc::clone(&self.conversation_logger));
        let router = RouterUseCase::new(client.clone());
        let scheduler = ExpertSchedulerUseCase::new(client.clone());
        let generator = GenerateCandidatesUseCase::new(client.clone());
        let judge = JudgeUseCase::new(client.clone());
        let critic = MetaCriticUseCase::new(client);

        let mut state = prior
            .map(OrchestratorState::from_snapshot)
            .unwrap_or_default();
        let mut stage = Stage::Init;
        let mut trace: Vec<RoundRecord> = Vec::new();
        let mut low_quality_streak = 0u32;

        info!(
            "Starting deliberation ({} mode, up to {} rounds)",
            query.mode(),
            params.max_rounds
        );

        let termination = loop {
            let round = state.round + 1;

            // ROUTING
            if self.cancelled_at(&mut stage, Stage::Routing)? {
                break Termination::Cancelled;
            }
            progress.on_round_start(round, params.max_rounds);
            progress.on_stage(round, Stage::Routing);
            let route = router.classify(&query, &state.router_guidance).await;
            let mut anomalies = Vec::new();
            if route.degraded {
                anomalies.push(RoundAnomaly::DegradedRouting);
            }

            // SCHEDULING
            if self.cancelled_at(&mut stage, Stage::Scheduling)? {
                break Termination::Cancelled;
            }
            progress.on_stage(round, Stage::Scheduling);
            let experts = ExpertDescriptor::registry(&state.expert_hints);
            let context = RoundContext {
                query: &query,
                vibe: route.vibe,
                summary: &state.summary,
            };
            let schedule = scheduler
                .select(&context, &experts, &params.selection(), progress)
                .await;
            anomalies.extend(schedule.anomalies.iter().cloned());
            let selected: Vec<Persona> = schedule.selected.iter().map(|g| g.persona()).collect();

            let result = if schedule.selected.is_empty() {
                stage.advance(Stage::Summarizing)?;
                RoundResult {
                    candidates: Vec::new(),
                    verdict: Verdict::no_consensus(NoConsensusReason::NoQualifyingExperts),
                    score: None,
                }
            } else {
                // JUDGING
                if self.cancelled_at(&mut stage, Stage::Judging)? {
                    break Termination::Cancelled;
                }
                progress.on_stage(round, Stage::Judging);
                let (candidates, failures) =
                    generator.generate(&context, &schedule.selected, progress).await;
                anomalies.extend(failures);
                ensure_no_orphans(&candidates, &selected)?;

                if candidates.is_empty() {
                    warn!("Round {}: no selected expert produced an answer", round);
                    stage.advance(Stage::Summarizing)?;
                    RoundResult {
                        candidates,
                        verdict: Verdict::no_consensus(NoConsensusReason::NoAnswers),
                        score: None,
                    }
                } else {
                    let verdict = judge
                        .rank(&query, &candidates, params.keep_judge_payload)
                        .await?;
                    verdict.validate_against(&candidates)?;
                    if verdict.is_fallback() {
                        anomalies.push(RoundAnomaly::JudgeFallback);
                    }

                    // CRITIQUING
                    if self.cancelled_at(&mut stage, Stage::Critiquing)? {
                        break Termination::Cancelled;
                    }
                    progress.on_stage(round, Stage::Critiquing);
                    let participants: Vec<Persona> =
                        candidates.iter().map(|c| c.persona).collect();
                    let critique = critic
                        .evaluate(CritiqueInput {
                            query: &query,
                            vibe: route.vibe,
                            answer: verdict.top_answer(&candidates).unwrap_or_default(),
                            rationale: &verdict.rationale,
                            summary: &state.summary,
                            participants: &participants,
                        })
                        .await;
                    if !critique.available {
                        anomalies.push(RoundAnomaly::CritiqueUnavailable);
                    }
                    state.apply_score(&critique.score);
                    stage.advance(Stage::Summarizing)?;
                    RoundResult {
                        candidates,
                        verdict,
                        score: Some(critique.score),
                    }
                }
            };

            // SUMMARIZING
            progress.on_stage(round, Stage::Summarizing);
            let entry = condense(round, route.vibe, &result.verdict, result.score.as_ref());
            state.append_summary(&entry);
            state.complete_round(round)?;

            let record = RoundRecord {
                round,
                vibe: route.vibe,
                gates: schedule.gates,
                selected,
                candidates: result.candidates,
                verdict: result.verdict,
                score: result.score,
                anomalies,
                summary_entry: entry,
            };
            self.log_round(&record);
            progress.on_round_complete(&record);

            let decision = self.stop_decision(&state, &record, &params, &mut low_quality_streak);
            trace.push(record);

            match decision {
                Some(termination) => {
                    stage.advance(Stage::Terminated)?;
                    break termination;
                }
                None => stage.advance(Stage::Continue)?,
            }
        };

        state.terminate();
        info!(
            "Deliberation finished after {} round(s): {}",
            state.round, termination
        );

        let outcome = build_outcome(state, trace, termination);
        self.conversation_logger.log(ConversationEvent::new(
            "session_completed",
            json!({
                "query": query.content(),
                "rounds": outcome.state.round,
                "termination": outcome.termination,
                "answer": outcome.answer,
            }),
        ));
        Ok(outcome)
    }

    /// Check for cancellation at the start of `next`, then enter it.
    ///
    /// Returns true when the session should stop. The partial round is
    /// discarded; the state keeps the last completed round.
    fn cancelled_at(&self, stage: &mut Stage, next: Stage) -> Result<bool, DomainError> {
        if next.is_cancellation_point() && is_cancelled(&self.cancellation) {
            info!("Cancellation requested before {}", next);
            stage.advance(Stage::Terminated)?;
            return Ok(true);
        }
        stage.advance(next)?;
        Ok(false)
    }

    /// Stop condition, evaluated after SUMMARIZING.
    fn stop_decision(
        &self,
        state: &OrchestratorState,
        record: &RoundRecord,
        params: &DeliberationParams,
        low_quality_streak: &mut u32,
    ) -> Option<Termination> {
        if let Some(score) = &record.score {
            if let ConvergenceDecision::Converge(reason) =
                self.policy.evaluate(&state.summary, &record.verdict, score)
            {
                info!("Round {}: converged ({})", record.round, reason);
                return Some(Termination::Converged(reason));
            }

            if score.is_low_quality() {
                *low_quality_streak += 1;
                warn!(
                    "Round {} scored low quality ({} in a row)",
                    record.round, low_quality_streak
                );
            } else {
                *low_quality_streak = 0;
            }
        } else {
            *low_quality_streak = 0;
        }

        if *low_quality_streak >= 2 {
            return Some(Termination::LowQuality);
        }
        if state.round >= params.max_rounds {
            return Some(Termination::BudgetExhausted);
        }
        None
    }

    fn log_round(&self, record: &RoundRecord) {
        match serde_json::to_value(record) {
            Ok(payload) => self
                .conversation_logger
                .log(ConversationEvent::new("round_completed", payload)),
            Err(e) => warn!("Failed to serialize round {}: {}", record.round, e),
        }
    }
}

fn build_outcome(
    state: OrchestratorState,
    trace: Vec<RoundRecord>,
    termination: Termination,
) -> DeliberationOutcome {
    let last_judged = trace.iter().rev().find(|r| r.top_answer().is_some());
    let (answer, rationale) = match last_judged {
        Some(record) => (
            record.top_answer().unwrap_or_default().to_string(),
            record.verdict.rationale.clone(),
        ),
        None => (
            NO_CONSENSUS_ANSWER.to_string(),
            trace.last().map_or_else(
                || Verdict::no_consensus(NoConsensusReason::NoAnswers).rationale,
                |r| r.verdict.rationale.clone(),
            ),
        ),
    };

    DeliberationOutcome {
        answer,
        rationale,
        final_vibe: trace.last().map(|r| r.vibe),
        summary: state.summary.clone(),
        snapshot: state.snapshot(),
        trace,
        state,
        termination,
    }
}
