//! Deliberation axes: the caller-chosen round mode, the routed vibe, and
//! the policy deciding when a session has converged.

pub mod convergence;
pub mod mode;
pub mod vibe;
