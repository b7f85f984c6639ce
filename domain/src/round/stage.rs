//! Round state machine.
//!
//! ```text
//! INIT -> ROUTING -> SCHEDULING -> JUDGING -> CRITIQUING -> SUMMARIZING -> CONTINUE | TERMINATED
//!                         |              |                      ^
//!                         |              +-- no candidates -----+
//!                         +------------ no qualifying experts --+
//! CONTINUE -> ROUTING
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Routing,
    Scheduling,
    Judging,
    Critiquing,
    Summarizing,
    Continue,
    Terminated,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "INIT",
            Stage::Routing => "ROUTING",
            Stage::Scheduling => "SCHEDULING",
            Stage::Judging => "JUDGING",
            Stage::Critiquing => "CRITIQUING",
            Stage::Summarizing => "SUMMARIZING",
            Stage::Continue => "CONTINUE",
            Stage::Terminated => "TERMINATED",
        }
    }

    /// Stages at whose start a pending cancellation is honored.
    pub fn is_cancellation_point(&self) -> bool {
        matches!(
            self,
            Stage::Routing | Stage::Scheduling | Stage::Judging | Stage::Critiquing
        )
    }

    pub fn can_transition_to(&self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Init, Routing)
                | (Init, Terminated)
                | (Routing, Scheduling)
                | (Routing, Terminated)
                | (Scheduling, Judging)
                | (Scheduling, Summarizing)
                | (Scheduling, Terminated)
                | (Judging, Critiquing)
                | (Judging, Summarizing)
                | (Judging, Terminated)
                | (Critiquing, Summarizing)
                | (Critiquing, Terminated)
                | (Summarizing, Continue)
                | (Summarizing, Terminated)
                | (Continue, Routing)
                | (Continue, Terminated)
        )
    }

    /// Move to `next`, rejecting transitions the machine does not have.
    pub fn advance(&mut self, next: Stage) -> Result<(), DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
