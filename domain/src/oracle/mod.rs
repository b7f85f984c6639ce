//! Reasoning-oracle boundary types.
//!
//! The oracle itself lives behind a port in the application layer. What
//! the domain owns is the shape of a request and the defensive reading of a
//! reply: every reply is tagged [`OracleReply::Parsed`] or
//! [`OracleReply::Unparseable`] before any component looks at it, so field
//! renames across oracle versions are absorbed in one place.

pub mod reply;
pub mod request;

pub use reply::{OracleReply, ReplyFields};
pub use request::{Capability, OracleRequest};
