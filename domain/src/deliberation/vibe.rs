//! Vibe labels produced by the router.

use crate::deliberation::mode::RoundMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse intent classification of a query.
///
/// Drives expert ordering and persona emphasis for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VibeLabel {
    /// Factual or precise answer, synthesis of known material
    #[default]
    Analytic,
    /// Ideas, variants, brainstorming
    Creative,
    /// Red-team, risks, failure modes
    Critical,
    /// Step-by-step action plan
    Plan,
}

impl VibeLabel {
    pub const ALL: [VibeLabel; 4] = [
        VibeLabel::Analytic,
        VibeLabel::Creative,
        VibeLabel::Critical,
        VibeLabel::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VibeLabel::Analytic => "analytic",
            VibeLabel::Creative => "creative",
            VibeLabel::Critical => "critical",
            VibeLabel::Plan => "plan",
        }
    }

    /// The vibe whose persona ordering applies once the round mode is
    /// taken into account.
    ///
    /// `verify` always leads with analysis and `attack` always leads with
    /// critique; the other modes defer to the routed vibe.
    pub fn ordering_bias(self, mode: RoundMode) -> VibeLabel {
        match mode {
            RoundMode::Verify => VibeLabel::Analytic,
            RoundMode::Attack => VibeLabel::Critical,
            RoundMode::Explore | RoundMode::Plan => self,
        }
    }

    /// Find a label in free-form router output.
    ///
    /// Accepts the bare label, a label wrapped in punctuation or quotes, or
    /// the first known label mentioned anywhere in the text.
    pub fn find_in(text: &str) -> Option<VibeLabel> {
        let lowered = text.trim().to_lowercase();
        if let Ok(label) = lowered.trim_matches(|c: char| !c.is_alphanumeric()).parse() {
            return Some(label);
        }
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .find_map(|word| word.parse().ok())
    }
}

impl fmt::Display for VibeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VibeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analytic" | "analytical" => Ok(VibeLabel::Analytic),
            "creative" => Ok(VibeLabel::Creative),
            "critical" => Ok(VibeLabel::Critical),
            "plan" | "planning" => Ok(VibeLabel::Plan),
            _ => Err(format!("Invalid VibeLabel: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_analytic() {
        assert_eq!(VibeLabel::default(), VibeLabel::Analytic);
    }

    #[test]
    fn test_find_in_bare_label() {
        assert_eq!(VibeLabel::find_in("critical"), Some(VibeLabel::Critical));
        assert_eq!(VibeLabel::find_in("  \"Plan\".\n"), Some(VibeLabel::Plan));
    }

    #[test]
    fn test_find_in_sentence() {
        assert_eq!(
            VibeLabel::find_in("The best label here is creative, given the brainstorm."),
            Some(VibeLabel::Creative)
        );
        assert_eq!(VibeLabel::find_in("no idea"), None);
        assert_eq!(VibeLabel::find_in(""), None);
    }

    #[test]
    fn test_ordering_bias() {
        assert_eq!(
            VibeLabel::Creative.ordering_bias(RoundMode::Verify),
            VibeLabel::Analytic
        );
        assert_eq!(
            VibeLabel::Plan.ordering_bias(RoundMode::Attack),
            VibeLabel::Critical
        );
        assert_eq!(
            VibeLabel::Creative.ordering_bias(RoundMode::Explore),
            VibeLabel::Creative
        );
    }
}
