//! Expert personas.
//!
//! The panel is a closed set of variants. Adding a persona means adding a
//! variant here together with its description and capability tags; nothing
//! is registered at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A panel persona.
///
/// Declaration order is significant: it is the registry order used for
/// deterministic tie-breaking during expert selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Analyst,
    Synthesizer,
    Critic,
    Theorist,
    Empiricist,
    Statistician,
    SystemsEngineer,
    CounterexampleHunter,
}

impl Persona {
    /// Every persona, in registry order.
    pub const ALL: [Persona; 8] = [
        Persona::Analyst,
        Persona::Synthesizer,
        Persona::Critic,
        Persona::Theorist,
        Persona::Empiricist,
        Persona::Statistician,
        Persona::SystemsEngineer,
        Persona::CounterexampleHunter,
    ];

    /// Canonical key, used in hint snapshots and oracle payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Analyst => "analyst",
            Persona::Synthesizer => "synthesizer",
            Persona::Critic => "critic",
            Persona::Theorist => "theorist",
            Persona::Empiricist => "empiricist",
            Persona::Statistician => "statistician",
            Persona::SystemsEngineer => "systems_engineer",
            Persona::CounterexampleHunter => "counterexample_hunter",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Analyst => "Analyst",
            Persona::Synthesizer => "Synthesizer",
            Persona::Critic => "Critic",
            Persona::Theorist => "Theorist",
            Persona::Empiricist => "Empiricist",
            Persona::Statistician => "Statistician",
            Persona::SystemsEngineer => "Systems Engineer",
            Persona::CounterexampleHunter => "Counterexample Hunter",
        }
    }

    /// Persona description and micro-guidelines sent with every request.
    pub fn description(&self) -> &'static str {
        match self {
            Persona::Analyst => {
                "Terse and rigorous. Prefer definitions and equations; separate what is known from what is assumed."
            }
            Persona::Synthesizer => {
                "Concrete, high-signal options. Vary the options, prune repetition, say how each could be tested."
            }
            Persona::Critic => {
                "Adversarial but fair red-team. Enumerate failure modes and kill-shots, then propose safer alternatives."
            }
            Persona::Theorist => {
                "Reason from first principles. Identify the underlying model, its axioms, and where it stops applying."
            }
            Persona::Empiricist => {
                "Ground every claim in observation. Name the experiment or data that would confirm or refute it."
            }
            Persona::Statistician => {
                "Quantify uncertainty. Check base rates, sample sizes, confounders, and effect sizes."
            }
            Persona::SystemsEngineer => {
                "Think in components, interfaces, and failure domains. Produce an ordered, testable plan."
            }
            Persona::CounterexampleHunter => {
                "Search for the smallest concrete case that breaks the claim. If none exists, say why."
            }
        }
    }

    /// Static capability tags used for diversity scoring.
    pub fn capability_tags(&self) -> &'static [&'static str] {
        match self {
            Persona::Analyst => &["definitions", "logic", "precision", "evidence"],
            Persona::Synthesizer => &["options", "integration", "creativity", "tests"],
            Persona::Critic => &["risks", "failure-modes", "counterevidence", "logic"],
            Persona::Theorist => &["first-principles", "models", "logic", "abstraction"],
            Persona::Empiricist => &["evidence", "experiments", "data", "tests"],
            Persona::Statistician => &["uncertainty", "data", "base-rates", "precision"],
            Persona::SystemsEngineer => &["planning", "interfaces", "failure-modes", "integration"],
            Persona::CounterexampleHunter => &["counterexamples", "edge-cases", "risks", "logic"],
        }
    }

    /// Resolve a hint-snapshot key to its canonical form.
    ///
    /// Known personas (including aliases such as `synth`) map to
    /// [`Persona::as_str`]; anything else is lowercased and kept.
    pub fn normalize_key(key: &str) -> String {
        match key.parse::<Persona>() {
            Ok(persona) => persona.as_str().to_string(),
            Err(_) => key.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match key.as_str() {
            "analyst" => Ok(Persona::Analyst),
            "synthesizer" | "synthesiser" | "synth" => Ok(Persona::Synthesizer),
            "critic" | "red_team" => Ok(Persona::Critic),
            "theorist" => Ok(Persona::Theorist),
            "empiricist" => Ok(Persona::Empiricist),
            "statistician" => Ok(Persona::Statistician),
            "systems_engineer" | "engineer" => Ok(Persona::SystemsEngineer),
            "counterexample_hunter" | "counterexample" => Ok(Persona::CounterexampleHunter),
            _ => Err(format!("Unknown persona: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for persona in Persona::ALL {
            assert_eq!(persona.as_str().parse::<Persona>().ok(), Some(persona));
            assert_eq!(persona.display_name().parse::<Persona>().ok(), Some(persona));
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("synth".parse::<Persona>().ok(), Some(Persona::Synthesizer));
        assert_eq!(
            "systems-engineer".parse::<Persona>().ok(),
            Some(Persona::SystemsEngineer)
        );
        assert_eq!(
            "Counterexample-Hunter".parse::<Persona>().ok(),
            Some(Persona::CounterexampleHunter)
        );
        assert!("oracle".parse::<Persona>().is_err());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(Persona::normalize_key("Synth"), "synthesizer");
        assert_eq!(Persona::normalize_key("analyst"), "analyst");
        assert_eq!(Persona::normalize_key("Historian"), "historian");
    }

    #[test]
    fn test_every_persona_has_tags() {
        for persona in Persona::ALL {
            assert!(!persona.capability_tags().is_empty());
            assert!(!persona.description().is_empty());
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Persona::CounterexampleHunter).unwrap();
        assert_eq!(json, "\"counterexample_hunter\"");
    }
}
