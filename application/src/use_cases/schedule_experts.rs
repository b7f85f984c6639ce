//! Expert scheduler: gate every expert, then select a diverse subset.
//!
//! Gate checks are independent and run concurrently; selection waits for
//! all of them (the join point) before the diversity pass.

use crate::ports::progress::DeliberationProgress;
use crate::ports::reasoning_oracle::ReasoningOracle;
use crate::use_cases::shared::OracleClient;
use mrce_domain::{
    Expert, ExpertDescriptor, GateResult, GatedExpert, RoundAnomaly, RoundContext,
    SelectionParams, order_for_vibe, select_diverse,
};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Scheduler output for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    /// Every gate result, in registry order
    pub gates: Vec<GateResult>,
    /// Selected experts, in vibe order
    pub selected: Vec<GatedExpert>,
    pub anomalies: Vec<RoundAnomaly>,
}

pub struct ExpertSchedulerUseCase<O: ReasoningOracle + 'static> {
    client: OracleClient<O>,
}

impl<O: ReasoningOracle + 'static> ExpertSchedulerUseCase<O> {
    pub fn new(client: OracleClient<O>) -> Self {
        Self { client }
    }

    pub async fn select(
        &self,
        round: &RoundContext<'_>,
        experts: &[ExpertDescriptor],
        params: &SelectionParams,
        progress: &dyn DeliberationProgress,
    ) -> ScheduleOutcome {
        let (gated, mut anomalies) = self.run_gates(round, experts, params, progress).await;

        let picked = select_diverse(&gated, params);
        let selected = order_for_vibe(picked, round.vibe.ordering_bias(round.query.mode()));

        if selected.is_empty() {
            warn!(
                "No expert cleared the gate (min confidence {:.2})",
                params.min_confidence
            );
            anomalies.push(RoundAnomaly::NoQualifyingExperts);
        } else {
            info!(
                "Selected {} expert(s): {}",
                selected.len(),
                selected
                    .iter()
                    .map(|g| g.persona().as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        ScheduleOutcome {
            gates: gated.into_iter().map(|g| g.gate).collect(),
            selected,
            anomalies,
        }
    }

    /// Gate every expert in parallel. Failed gates count as confidence 0.
    async fn run_gates(
        &self,
        round: &RoundContext<'_>,
        experts: &[ExpertDescriptor],
        params: &SelectionParams,
        progress: &dyn DeliberationProgress,
    ) -> (Vec<GatedExpert>, Vec<RoundAnomaly>) {
        let mut join_set = JoinSet::new();

        for (idx, expert) in experts.iter().enumerate() {
            let client = self.client.clone();
            let request = expert.gate_request(round);
            join_set.spawn(async move { (idx, client.ask_parsed(&request).await) });
        }

        let mut gates: Vec<Option<GateResult>> = vec![None; experts.len()];
        let mut anomalies = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((idx, Ok(reply))) => {
                    let persona = experts[idx].persona();
                    if !reply.is_parsed() {
                        warn!("Gate reply from {} was unparseable", persona);
                        anomalies.push(RoundAnomaly::GateFailed(persona));
                    }
                    let gate = GateResult::from_reply(persona, &reply);
                    debug!(
                        "Gate {}: respond={} confidence={:.2}",
                        persona, gate.respond, gate.confidence
                    );
                    progress.on_gate_complete(persona, gate.is_eligible(params.min_confidence));
                    gates[idx] = Some(gate);
                }
                Ok((idx, Err(e))) => {
                    let persona = experts[idx].persona();
                    warn!("Gate for {} failed: {}", persona, e);
                    anomalies.push(RoundAnomaly::GateFailed(persona));
                    progress.on_gate_complete(persona, false);
                    gates[idx] = Some(GateResult::failed(persona));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        let gated = experts
            .iter()
            .zip(gates)
            .map(|(expert, gate)| {
                let gate = gate.unwrap_or_else(|| GateResult::failed(expert.persona()));
                GatedExpert::new(expert.clone(), gate)
            })
            .collect();
        (gated, anomalies)
    }
}
