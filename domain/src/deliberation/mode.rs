//! Round mode definitions.
//!
//! [`RoundMode`] is the caller-facing bias for a deliberation:
//! - Explore: divergent, option-generating rounds
//! - Verify: check a claim (default)
//! - Attack: red-team the claim, hunt failure modes
//! - Plan: converge on an actionable plan

use serde::{Deserialize, Serialize};
use std::fmt;

/// Round mode bias for a deliberation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    Explore,
    #[default]
    Verify,
    Attack,
    Plan,
}

impl RoundMode {
    pub const ALL: [RoundMode; 4] = [
        RoundMode::Explore,
        RoundMode::Verify,
        RoundMode::Attack,
        RoundMode::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundMode::Explore => "explore",
            RoundMode::Verify => "verify",
            RoundMode::Attack => "attack",
            RoundMode::Plan => "plan",
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            RoundMode::Explore => "Explore: generate and compare distinct options",
            RoundMode::Verify => "Verify: check the claim against evidence",
            RoundMode::Attack => "Attack: red-team the claim and enumerate failure modes",
            RoundMode::Plan => "Plan: converge on an ordered, testable plan",
        }
    }
}

impl fmt::Display for RoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explore" | "e" => Ok(RoundMode::Explore),
            "verify" | "v" => Ok(RoundMode::Verify),
            "attack" | "a" => Ok(RoundMode::Attack),
            "plan" | "p" => Ok(RoundMode::Plan),
            _ => Err(format!(
                "Invalid RoundMode: {} (expected explore|verify|attack|plan)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RoundMode::Explore), "explore");
        assert_eq!(format!("{}", RoundMode::Attack), "attack");
    }

    #[test]
    fn test_default() {
        assert_eq!(RoundMode::default(), RoundMode::Verify);
    }

    #[test]
    fn test_from_str() {
        for mode in RoundMode::ALL {
            assert_eq!(mode.as_str().parse::<RoundMode>().ok(), Some(mode));
        }
        assert_eq!("PLAN".parse::<RoundMode>().ok(), Some(RoundMode::Plan));
        assert!("debate".parse::<RoundMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RoundMode::Attack).unwrap();
        assert_eq!(json, "\"attack\"");
    }
}
