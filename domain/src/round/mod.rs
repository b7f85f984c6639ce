//! Cross-round state and per-round records.

pub mod record;
pub mod snapshot;
pub mod stage;
pub mod state;
pub mod termination;

pub use record::{RoundAnomaly, RoundRecord, condense};
pub use snapshot::HintSnapshot;
pub use stage::Stage;
pub use state::OrchestratorState;
pub use termination::Termination;
