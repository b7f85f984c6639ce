//! Deliberation configuration from TOML (`[deliberation]` section)

use mrce_application::DeliberationParams;
use mrce_domain::{DEFAULT_GOAL, RoundMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round budget, selection knobs and query defaults
///
/// # Example
///
/// ```toml
/// [deliberation]
/// max_rounds = 4
/// top_k = 2
/// gate_min_conf = 0.4
/// mode = "attack"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    pub max_rounds: u32,
    pub top_k: usize,
    pub gate_min_conf: f64,
    pub gate_lambda: f64,
    /// Default goal for queries that do not set one
    pub goal: Option<String>,
    /// Default round mode (explore, verify, attack, plan)
    pub mode: String,
    /// Per-call oracle timeout; 0 disables it
    pub oracle_timeout_secs: u64,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            top_k: 3,
            gate_min_conf: 0.35,
            gate_lambda: 0.3,
            goal: None,
            mode: RoundMode::default().as_str().to_string(),
            oracle_timeout_secs: 60,
        }
    }
}

impl FileDeliberationConfig {
    /// Parse the configured mode; `None` when it is not a known mode.
    pub fn parse_mode(&self) -> Option<RoundMode> {
        self.mode.parse().ok()
    }

    pub fn goal_or_default(&self) -> &str {
        self.goal
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GOAL)
    }

    pub fn oracle_timeout(&self) -> Option<Duration> {
        (self.oracle_timeout_secs > 0).then(|| Duration::from_secs(self.oracle_timeout_secs))
    }

    pub fn to_params(&self) -> DeliberationParams {
        DeliberationParams::default()
            .with_max_rounds(self.max_rounds)
            .with_top_k(self.top_k)
            .with_gate_min_conf(self.gate_min_conf)
            .with_gate_lambda(self.gate_lambda)
            .with_oracle_timeout(self.oracle_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let config = FileDeliberationConfig::default();
        assert_eq!(config.to_params(), DeliberationParams::default());
        assert_eq!(config.parse_mode(), Some(RoundMode::Verify));
        assert_eq!(config.goal_or_default(), DEFAULT_GOAL);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = FileDeliberationConfig {
            oracle_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.oracle_timeout(), None);
    }

    #[test]
    fn test_blank_goal_uses_default() {
        let config = FileDeliberationConfig {
            goal: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.goal_or_default(), DEFAULT_GOAL);
    }
}
