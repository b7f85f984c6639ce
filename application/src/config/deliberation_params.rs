//! Deliberation parameters: round budget, selection knobs and timeouts.

use mrce_domain::SelectionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("max_rounds must be at least 1")]
    ZeroRounds,

    #[error("top_k must be at least 1")]
    ZeroTopK,

    #[error("gate_min_conf must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("gate_lambda must be non-negative, got {0}")]
    NegativeLambda(f64),
}

/// Per-session loop control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Round budget; the only guaranteed terminator
    pub max_rounds: u32,
    pub top_k: usize,
    /// Hard confidence floor for gate results
    pub gate_min_conf: f64,
    /// Diversity penalty weight
    pub gate_lambda: f64,
    /// Per-call oracle timeout
    pub oracle_timeout: Option<Duration>,
    /// Keep the judge request payload on each verdict
    pub keep_judge_payload: bool,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            top_k: 3,
            gate_min_conf: 0.35,
            gate_lambda: 0.3,
            oracle_timeout: Some(Duration::from_secs(60)),
            keep_judge_payload: false,
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_gate_min_conf(mut self, min_conf: f64) -> Self {
        self.gate_min_conf = min_conf;
        self
    }

    pub fn with_gate_lambda(mut self, lambda: f64) -> Self {
        self.gate_lambda = lambda;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_judge_payload(mut self, keep: bool) -> Self {
        self.keep_judge_payload = keep;
        self
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_rounds == 0 {
            return Err(ParamsError::ZeroRounds);
        }
        if self.top_k == 0 {
            return Err(ParamsError::ZeroTopK);
        }
        if !(0.0..=1.0).contains(&self.gate_min_conf) {
            return Err(ParamsError::ConfidenceOutOfRange(self.gate_min_conf));
        }
        if self.gate_lambda < 0.0 || self.gate_lambda.is_nan() {
            return Err(ParamsError::NegativeLambda(self.gate_lambda));
        }
        Ok(())
    }

    pub fn selection(&self) -> SelectionParams {
        SelectionParams {
            top_k: self.top_k,
            min_confidence: self.gate_min_conf,
            lambda: self.gate_lambda,
        }
    }
}
