use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use trigger_engine_core::{EngineError, Result, State, normalize_trigger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub to: State,
    pub response: String,
}

impl TransitionRule {
    pub fn new(to: State, response: impl Into<String>) -> Self {
        Self {
            to,
            response: response.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRules {
    #[serde(default)]
    pub transitions: BTreeMap<String, TransitionRule>,
    pub fallback: String,
}

impl StateRules {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            transitions: BTreeMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn on(mut self, trigger: impl Into<String>, to: State, response: impl Into<String>) -> Self {
        self.transitions
            .insert(trigger.into(), TransitionRule::new(to, response));
        self
    }
}

/// Maps (state, normalized trigger) to the next state and response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    pub states: BTreeMap<State, StateRules>,
}

impl TransitionTable {
    pub fn builtin() -> Self {
        let mut states = BTreeMap::new();
        states.insert(
            State::Idle,
            StateRules::new("Trigger not recognized. Remaining IDLE.")
                .on(
                    "start_task",
                    State::Active,
                    "Transitioning to ACTIVE state. Task initiated and processing...",
                )
                .on(
                    "end_shift",
                    State::EndDay,
                    "Transitioning to END_DAY state. Shutting down systems.",
                ),
        );
        states.insert(
            State::Active,
            StateRules::new("Currently processing. Ignoring non-critical trigger")
                .on(
                    "task_complete",
                    State::TaskDone,
                    "Task processing finished. Transitioning to TASK_DONE state.",
                )
                .on(
                    "force_stop",
                    State::Idle,
                    "Emergency stop received. Returning to IDLE state.",
                ),
        );
        states.insert(
            State::TaskDone,
            StateRules::new("Task completed. Awaiting 'reset' or 'end_shift' trigger.")
                .on(
                    "reset",
                    State::Idle,
                    "Results logged and reported. Returning to IDLE state, awaiting next task.",
                )
                .on(
                    "end_shift",
                    State::EndDay,
                    "Results logged. Transitioning to END_DAY state.",
                ),
        );
        states.insert(
            State::EndDay,
            StateRules::new("Engine is powered down. No further actions possible until restart."),
        );
        Self { states }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        for state in State::ALL {
            let rules = self.states.get(&state).ok_or_else(|| {
                EngineError::InvalidTable(format!("State '{}' has no rules", state))
            })?;

            if rules.fallback.trim().is_empty() {
                return Err(EngineError::InvalidTable(format!(
                    "State '{}' has an empty fallback response",
                    state
                )));
            }

            if state.is_terminal() && !rules.transitions.is_empty() {
                return Err(EngineError::InvalidTable(format!(
                    "Terminal state '{}' cannot declare transitions",
                    state
                )));
            }

            for (trigger, rule) in &rules.transitions {
                if trigger.is_empty() {
                    return Err(EngineError::InvalidTable(format!(
                        "State '{}' has a transition with an empty trigger",
                        state
                    )));
                }
                if normalize_trigger(trigger) != *trigger {
                    return Err(EngineError::InvalidTable(format!(
                        "State '{}' has trigger '{}' that is not normalized (expected '{}')",
                        state,
                        trigger,
                        normalize_trigger(trigger)
                    )));
                }
                if rule.response.trim().is_empty() {
                    return Err(EngineError::InvalidTable(format!(
                        "State '{}' trigger '{}' has an empty response",
                        state, trigger
                    )));
                }
            }
        }
        Ok(())
    }

    /// Expects a trigger already passed through [`normalize_trigger`].
    pub fn lookup(&self, state: State, trigger: &str) -> Option<&TransitionRule> {
        self.states.get(&state)?.transitions.get(trigger)
    }

    pub fn fallback(&self, state: State) -> &str {
        self.states
            .get(&state)
            .map(|rules| rules.fallback.as_str())
            .unwrap_or_default()
    }

    pub fn triggers(&self, state: State) -> Vec<&str> {
        self.states
            .get(&state)
            .map(|rules| rules.transitions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Startup and per-trigger notices log at `info` when set, `debug` otherwise.
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    #[serde(default)]
    pub max_history: Option<usize>,

    #[serde(default)]
    pub table: TransitionTable,
}

fn default_verbose() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbose: default_verbose(),
            max_history: None,
            table: TransitionTable::builtin(),
        }
    }
}

impl EngineConfig {
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history == Some(0) {
            return Err(EngineError::InvalidConfig(
                "max_history must be greater than zero".into(),
            ));
        }
        self.table.validate()
    }
}
