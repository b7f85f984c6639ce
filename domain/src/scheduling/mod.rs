//! Expert scheduling: diversity-aware selection over gated experts.

pub mod selection;

pub use selection::{GatedExpert, SelectionParams, jaccard, order_for_vibe, select_diverse};
