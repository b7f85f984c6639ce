use crate::deliberation::convergence::ConvergenceReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum Termination {
    /// Round counter reached `max_rounds`
    BudgetExhausted,
    Converged(ConvergenceReason),
    /// Two consecutive low-quality rounds
    LowQuality,
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::BudgetExhausted => write!(f, "round budget exhausted"),
            Termination::Converged(reason) => write!(f, "converged ({})", reason),
            Termination::LowQuality => write!(f, "two consecutive low-quality rounds"),
            Termination::Cancelled => write!(f, "cancelled"),
        }
    }
}
