//! Engine states, transition events and trigger normalization

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    #[default]
    Idle,
    Active,
    TaskDone,
    EndDay,
}

impl State {
    pub const ALL: [State; 4] = [State::Idle, State::Active, State::TaskDone, State::EndDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Idle => "IDLE",
            State::Active => "ACTIVE",
            State::TaskDone => "TASK_DONE",
            State::EndDay => "END_DAY",
        }
    }

    /// No trigger moves the engine out of a terminal state; only a restart does.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::EndDay)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        State::ALL
            .into_iter()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| EngineError::UnknownState(s.to_string()))
    }
}

/// Trims surrounding whitespace and lowercases, so `" START_TASK "` matches `"start_task"`.
///
/// The ASCII separators U+001C..U+001F count as whitespace here.
pub fn normalize_trigger(trigger: &str) -> String {
    trigger
        .trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransitionEvent {
    pub from: State,
    pub to: State,
    pub trigger: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    pub from: State,
    pub to: State,
    pub trigger: String,
    pub response: String,
    /// False when the state's fallback or the terminal response was used.
    pub matched: bool,
}

impl TriggerOutcome {
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(State::Idle.to_string(), "IDLE");
        assert_eq!(State::TaskDone.to_string(), "TASK_DONE");
        assert_eq!(State::EndDay.to_string(), "END_DAY");
    }

    #[test]
    fn test_state_parse_case_insensitive() {
        assert_eq!("active".parse::<State>().unwrap(), State::Active);
        assert_eq!(" Task_Done ".parse::<State>().unwrap(), State::TaskDone);
        assert_eq!("END_DAY".parse::<State>().unwrap(), State::EndDay);
    }

    #[test]
    fn test_state_parse_unknown() {
        let err = "sleeping".parse::<State>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownState(ref s) if s == "sleeping"));
    }

    #[test]
    fn test_state_serde_names() {
        let json = serde_json::to_string(&State::TaskDone).unwrap();
        assert_eq!(json, "\"TASK_DONE\"");
        let state: State = serde_json::from_str("\"END_DAY\"").unwrap();
        assert_eq!(state, State::EndDay);
    }

    #[test]
    fn test_only_end_day_is_terminal() {
        let terminal: Vec<State> = State::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![State::EndDay]);
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(State::default(), State::Idle);
    }

    #[test]
    fn test_normalize_trigger() {
        assert_eq!(normalize_trigger("START_TASK "), "start_task");
        assert_eq!(normalize_trigger("\t Reset\n"), "reset");
        assert_eq!(normalize_trigger("   "), "");
        assert_eq!(normalize_trigger(""), "");
    }

    #[test]
    fn test_normalize_trigger_strips_separators() {
        assert_eq!(normalize_trigger("start_task\x1f"), "start_task");
        assert_eq!(normalize_trigger("\x1c\x1dReset\x1e "), "reset");
        assert_eq!(normalize_trigger("end\x1fshift"), "end\x1fshift");
    }

    #[test]
    fn test_outcome_changed_state() {
        let outcome = TriggerOutcome {
            from: State::Idle,
            to: State::Active,
            trigger: "start_task".into(),
            response: String::new(),
            matched: true,
        };
        assert!(outcome.changed_state());
    }
}
