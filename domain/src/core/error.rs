//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Everything except [`DomainError::Cancelled`] indicates a defect in the
/// round engine itself; oracle hiccups never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Judge requires at least one candidate")]
    NoCandidates,

    #[error("Candidate from '{0}' was not produced by a selected expert")]
    OrphanCandidate(String),

    #[error("Verdict references unknown candidate '{0}'")]
    UnknownRankedCandidate(String),

    #[error("Verdict ranks candidate '{0}' more than once")]
    DuplicateRankedCandidate(String),

    #[error("Round counter out of sequence: expected {expected}, found {found}")]
    RoundOutOfSequence { expected: u32, found: u32 },

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Invariant violations abort the round loop.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, DomainError::Cancelled | DomainError::InvalidQuery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_invariant_classification() {
        assert!(DomainError::NoCandidates.is_invariant_violation());
        assert!(DomainError::UnknownRankedCandidate("critic".into()).is_invariant_violation());
        assert!(!DomainError::Cancelled.is_invariant_violation());
        assert!(!DomainError::InvalidQuery("empty".into()).is_invariant_violation());
    }

    #[test]
    fn test_round_out_of_sequence_display() {
        let error = DomainError::RoundOutOfSequence {
            expected: 2,
            found: 4,
        };
        assert_eq!(
            error.to_string(),
            "Round counter out of sequence: expected 2, found 4"
        );
    }
}
