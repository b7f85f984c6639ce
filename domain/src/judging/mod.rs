//! Judging: candidates, verdicts, and the comparison/fallback rankers.

pub mod candidate;
pub mod comparison;
pub mod ranking;
pub mod verdict;

pub use candidate::{Candidate, ensure_no_orphans};
pub use comparison::comparison_request;
pub use ranking::{FALLBACK_RATIONALE, fallback_ranking, fallback_score, resolve_ranking};
pub use verdict::{NoConsensusReason, SINGLE_CANDIDATE_RATIONALE, Verdict, VerdictSource};
