use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use trigger_engine_core::{Result, State, StateTransitionEvent, TriggerOutcome, normalize_trigger};

use super::config::{EngineConfig, TransitionTable};
use super::listener::TransitionListener;

macro_rules! notice {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

#[derive(Debug, Default)]
struct EngineState {
    current: State,
    previous: Option<State>,
    tasks_completed: u32,
    history: VecDeque<StateTransitionEvent>,
}

pub struct Engine {
    table: TransitionTable,
    verbose: bool,
    max_history: Option<usize>,
    inner: RwLock<EngineState>,
    /// Taken before `inner` is released so listeners see events in commit order.
    dispatch: Mutex<()>,
    listeners: Vec<Arc<dyn TransitionListener>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let engine = Self {
            table: config.table,
            verbose: config.verbose,
            max_history: config.max_history,
            inner: RwLock::new(EngineState::default()),
            dispatch: Mutex::new(()),
            listeners: Vec::new(),
        };
        notice!(engine.verbose, state = %engine.current(), "Trigger engine initialized");
        engine
    }

    pub fn with_listener(mut self, listener: Arc<dyn TransitionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Applies a trigger and returns the response text. Never fails.
    pub fn process_trigger(&self, trigger: &str) -> String {
        self.process(trigger).response
    }

    pub fn process(&self, trigger: &str) -> TriggerOutcome {
        let trigger = normalize_trigger(trigger);
        notice!(self.verbose, trigger = %trigger, "Trigger received");

        let mut inner = self.inner.write();
        let (outcome, event) = {
            let from = inner.current;
            let rule = if from.is_terminal() {
                None
            } else {
                self.table.lookup(from, &trigger)
            };

            match rule {
                Some(rule) => {
                    let to = rule.to;
                    inner.previous = Some(from);
                    inner.current = to;
                    if to == State::TaskDone && from != State::TaskDone {
                        inner.tasks_completed += 1;
                    }

                    let event = StateTransitionEvent {
                        from,
                        to,
                        trigger: trigger.clone(),
                        timestamp: Utc::now(),
                    };
                    inner.history.push_back(event.clone());
                    if let Some(max) = self.max_history {
                        while inner.history.len() > max {
                            inner.history.pop_front();
                        }
                    }

                    let outcome = TriggerOutcome {
                        from,
                        to,
                        trigger,
                        response: rule.response.clone(),
                        matched: true,
                    };
                    (outcome, Some(event))
                }
                None => {
                    let outcome = TriggerOutcome {
                        from,
                        to: from,
                        trigger,
                        response: self.table.fallback(from).to_string(),
                        matched: false,
                    };
                    (outcome, None)
                }
            }
        };
        let dispatch = match &event {
            Some(_) if !self.listeners.is_empty() => Some(self.dispatch.lock()),
            _ => None,
        };
        drop(inner);

        notice!(
            self.verbose,
            state = %outcome.to,
            matched = outcome.matched,
            "State updated"
        );

        if let Some(event) = event {
            for listener in &self.listeners {
                listener.on_transition(&event);
            }
        }
        drop(dispatch);

        outcome
    }

    pub fn current(&self) -> State {
        self.inner.read().current
    }

    pub fn previous(&self) -> Option<State> {
        self.inner.read().previous
    }

    pub fn is_terminated(&self) -> bool {
        self.current().is_terminal()
    }

    pub fn tasks_completed(&self) -> u32 {
        self.inner.read().tasks_completed
    }

    pub fn history(&self) -> Vec<StateTransitionEvent> {
        self.inner.read().history.iter().cloned().collect()
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Restart: back to IDLE with history and task count cleared.
    pub fn reset(&self) {
        *self.inner.write() = EngineState::default();
        notice!(self.verbose, state = %State::Idle, "Trigger engine restarted");
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
