//! Domain layer for mrce
//!
//! Pure types and algorithms for multi-round expert deliberation. No I/O,
//! no async runtime; everything that talks to the reasoning oracle lives in
//! the application layer behind ports.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! Each round routes the query to a vibe, gates the expert panel, selects a
//! diverse confident subset, judges their candidates and critiques the
//! result. Critique hints flow into [`OrchestratorState`] and steer the next
//! round.
//!
//! ## Defensive replies
//!
//! Oracle replies are tagged [`OracleReply::Parsed`] or
//! [`OracleReply::Unparseable`] before anything reads them. Every component
//! has a fallback for the unparseable case.

pub mod core;
pub mod critique;
pub mod deliberation;
pub mod expert;
pub mod judging;
pub mod oracle;
pub mod round;
pub mod scheduling;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    query::{DEFAULT_GOAL, Query},
};
pub use critique::{LOW_QUALITY_THRESHOLD, RoundScore, StopLabel, critique_request};
pub use deliberation::{
    convergence::{
        ConvergenceDecision, ConvergencePolicy, ConvergenceReason, NeverConverge,
        StopLabelConvergence,
    },
    mode::RoundMode,
    vibe::VibeLabel,
};
pub use expert::{Expert, ExpertDescriptor, GateResult, Persona, RoundContext};
pub use judging::{
    Candidate, FALLBACK_RATIONALE, NoConsensusReason, SINGLE_CANDIDATE_RATIONALE, Verdict,
    VerdictSource, comparison_request, ensure_no_orphans, fallback_ranking, resolve_ranking,
};
pub use oracle::{Capability, OracleReply, OracleRequest, ReplyFields};
pub use round::{
    HintSnapshot, OrchestratorState, RoundAnomaly, RoundRecord, Stage, Termination, condense,
};
pub use scheduling::{GatedExpert, SelectionParams, order_for_vibe, select_diverse};
