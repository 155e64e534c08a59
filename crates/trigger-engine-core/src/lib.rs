//! Core types and errors for the trigger engine

pub mod error;
pub mod types;

pub use error::{EngineError, Result};
pub use types::{State, StateTransitionEvent, TriggerOutcome, normalize_trigger};
