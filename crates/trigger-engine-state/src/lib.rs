//! Table-driven state machine for the trigger engine

mod config;
mod listener;
mod machine;

pub use config::{EngineConfig, StateRules, TransitionRule, TransitionTable};
pub use listener::TransitionListener;
pub use machine::Engine;
pub use trigger_engine_core::{State, StateTransitionEvent, TriggerOutcome};
