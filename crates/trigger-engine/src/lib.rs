//! Trigger Engine
//!
//! A four-state machine (`IDLE`, `ACTIVE`, `TASK_DONE`, `END_DAY`) driven by
//! string triggers. Each call to [`Engine::process_trigger`] looks up the
//! normalized trigger in a fixed transition table, moves the engine and
//! returns a canned response.
//!
//! ```
//! use trigger_engine::{Engine, State};
//!
//! let engine = Engine::new();
//! let response = engine.process_trigger(" START_TASK ");
//! assert_eq!(engine.current(), State::Active);
//! assert!(response.starts_with("Transitioning to ACTIVE"));
//! ```

pub mod error {
    pub use trigger_engine_core::{EngineError, Result};
}

pub mod state {
    pub use trigger_engine_core::{State, StateTransitionEvent, TriggerOutcome, normalize_trigger};
    pub use trigger_engine_state::{Engine, TransitionListener};
}

pub mod config {
    pub use trigger_engine_state::{EngineConfig, StateRules, TransitionRule, TransitionTable};
}

pub use config::{EngineConfig, TransitionTable};
pub use error::{EngineError, Result};
pub use state::{Engine, State, StateTransitionEvent, TransitionListener, TriggerOutcome};
