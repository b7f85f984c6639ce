//! Use cases: one per round stage, plus the orchestrator that drives them.

pub mod generate_candidates;
pub mod judge;
pub mod meta_critic;
pub mod route_query;
pub mod run_deliberation;
pub mod schedule_experts;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;
