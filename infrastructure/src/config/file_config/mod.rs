//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. They are deserialized
//! directly and converted into application parameters at startup.

mod deliberation;
mod oracle;
mod output;

pub use deliberation::FileDeliberationConfig;
pub use oracle::FileOracleConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single problem found while validating the config.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("deliberation.max_rounds must be at least 1")]
    ZeroRounds,

    #[error("deliberation.top_k must be at least 1")]
    ZeroTopK,

    #[error("deliberation.gate_min_conf must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("deliberation.gate_lambda must be non-negative, got {0}")]
    NegativeLambda(f64),

    #[error("deliberation.mode '{0}' is not one of explore, verify, attack, plan")]
    InvalidMode(String),

    #[error("oracle.model '{0}' must be written as provider/model")]
    InvalidModel(String),

    #[error("oracle.temperature must be within [0, 2], got {0}")]
    TemperatureOutOfRange(f32),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub deliberation: FileDeliberationConfig,
    pub oracle: FileOracleConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let d = &self.deliberation;

        if d.max_rounds == 0 {
            issues.push(ConfigValidationError::ZeroRounds);
        }
        if d.top_k == 0 {
            issues.push(ConfigValidationError::ZeroTopK);
        }
        if !(0.0..=1.0).contains(&d.gate_min_conf) {
            issues.push(ConfigValidationError::ConfidenceOutOfRange(d.gate_min_conf));
        }
        if d.gate_lambda < 0.0 || d.gate_lambda.is_nan() {
            issues.push(ConfigValidationError::NegativeLambda(d.gate_lambda));
        }
        if d.parse_mode().is_none() {
            issues.push(ConfigValidationError::InvalidMode(d.mode.clone()));
        }

        let o = &self.oracle;
        match o.model.split_once('/') {
            Some((provider, model)) if !provider.trim().is_empty() && !model.trim().is_empty() => {}
            _ => issues.push(ConfigValidationError::InvalidModel(o.model.clone())),
        }
        if !(0.0..=2.0).contains(&o.temperature) {
            issues.push(ConfigValidationError::TemperatureOutOfRange(o.temperature));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrce_domain::RoundMode;

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.output.color);
        assert_eq!(config.oracle.model, "openai/gpt-4o-mini");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
[deliberation]
max_rounds = 5
mode = "plan"
goal = "Find the cheapest rollout"

[output]
color = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.deliberation.max_rounds, 5);
        assert_eq!(config.deliberation.top_k, 3);
        assert_eq!(config.deliberation.parse_mode(), Some(RoundMode::Plan));
        assert_eq!(
            config.deliberation.goal_or_default(),
            "Find the cheapest rollout"
        );
        assert!(!config.output.color);
        assert_eq!(config.oracle.max_tokens, 1024);
    }

    #[test]
    fn test_parse_oracle_section() {
        let toml_str = r#"
[oracle]
model = "ollama_chat/llama3"
api_base = "http://localhost:11434/v1"
temperature = 0.0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.oracle.model, "ollama_chat/llama3");
        assert_eq!(
            config.oracle.api_base.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert_eq!(config.oracle.temperature, 0.0);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[deliberation]
max_rounds = 0
top_k = 0
gate_min_conf = 1.5
gate_lambda = -0.1
mode = "debate"

[oracle]
model = "gpt-4o"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 6);
        assert!(issues.contains(&ConfigValidationError::ZeroRounds));
        assert!(issues.contains(&ConfigValidationError::ZeroTopK));
        assert!(issues.contains(&ConfigValidationError::ConfidenceOutOfRange(1.5)));
        assert!(issues.contains(&ConfigValidationError::NegativeLambda(-0.1)));
        assert!(issues.contains(&ConfigValidationError::InvalidMode("debate".to_string())));
        assert!(issues.contains(&ConfigValidationError::InvalidModel("gpt-4o".to_string())));
    }
}
