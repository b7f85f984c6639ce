//! Query value object

use crate::core::error::DomainError;
use crate::deliberation::mode::RoundMode;
use serde::{Deserialize, Serialize};

/// Goal used when the caller does not supply one.
pub const DEFAULT_GOAL: &str = "Reach irreducible truth or contradiction.";

/// A query to be deliberated (Value Object)
///
/// Immutable once built: the text, the ultimate goal the panel works toward,
/// and the round mode that biases routing and expert ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    content: String,
    goal: String,
    mode: RoundMode,
}

impl Query {
    /// Try to create a new query, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuery(
                "query text cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: content.trim().to_string(),
            goal: DEFAULT_GOAL.to_string(),
            mode: RoundMode::default(),
        })
    }

    /// Replace the goal. Blank goals fall back to [`DEFAULT_GOAL`].
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        let goal = goal.into();
        self.goal = if goal.trim().is_empty() {
            DEFAULT_GOAL.to_string()
        } else {
            goal.trim().to_string()
        };
        self
    }

    pub fn with_mode(mut self, mode: RoundMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn mode(&self) -> RoundMode {
        self.mode
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
