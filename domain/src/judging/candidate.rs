use crate::core::error::DomainError;
use crate::expert::Persona;
use serde::{Deserialize, Serialize};

/// One expert's answer for a round. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub persona: Persona,
    pub answer: String,
    /// Gate confidence of the producing expert
    pub confidence: f64,
}

impl Candidate {
    pub fn new(persona: Persona, answer: impl Into<String>, confidence: f64) -> Self {
        Self {
            persona,
            answer: answer.into(),
            confidence,
        }
    }

    /// Label shown to the judge.
    pub fn label(&self) -> &'static str {
        self.persona.display_name()
    }
}

/// Every candidate must come from an expert selected this round.
pub fn ensure_no_orphans(candidates: &[Candidate], selected: &[Persona]) -> Result<(), DomainError> {
    match candidates.iter().find(|c| !selected.contains(&c.persona)) {
        Some(orphan) => Err(DomainError::OrphanCandidate(orphan.persona.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_detection() {
        let candidates = vec![
            Candidate::new(Persona::Analyst, "a", 0.9),
            Candidate::new(Persona::Theorist, "t", 0.6),
        ];
        assert!(ensure_no_orphans(&candidates, &[Persona::Analyst, Persona::Theorist]).is_ok());
        assert_eq!(
            ensure_no_orphans(&candidates, &[Persona::Analyst]),
            Err(DomainError::OrphanCandidate("theorist".into()))
        );
    }

    #[test]
    fn test_label_is_display_name() {
        let candidate = Candidate::new(Persona::CounterexampleHunter, "x", 0.5);
        assert_eq!(candidate.label(), "Counterexample Hunter");
    }
}
