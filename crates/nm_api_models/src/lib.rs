//! JSON DTOs shared by the CLI and any embedding service.
//!
//! Transport models stay independent from engine internals: the engine
//! converts into these, never the other way round.

pub mod json_types;

pub use json_types::*;
