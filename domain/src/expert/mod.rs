//! Expert panel: personas, per-round descriptors, and gate results.

pub mod capability;
pub mod descriptor;
pub mod gate;
pub mod persona;

pub use capability::{Expert, RoundContext};
pub use descriptor::ExpertDescriptor;
pub use gate::GateResult;
pub use persona::Persona;
