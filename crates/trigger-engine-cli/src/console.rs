use std::io::{self, BufRead, Write};

use anyhow::Result;

use trigger_engine::{Engine, StateTransitionEvent, TransitionListener};

use crate::print_outcome;

pub struct ConsoleListener;

impl TransitionListener for ConsoleListener {
    fn on_transition(&self, event: &StateTransitionEvent) {
        println!("[Transition] {} -> {} ({})", event.from, event.to, event.trigger);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    State,
    History,
    Reset,
    Quit,
    Trigger(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":state" => Input::State,
        ":history" => Input::History,
        ":reset" => Input::Reset,
        ":quit" | ":exit" => Input::Quit,
        other => Input::Trigger(other),
    }
}

pub fn run(engine: &Engine, json: bool) -> Result<()> {
    println!("=== Trigger Engine Console ===");
    println!("Triggers: {}", known_triggers(engine));
    println!("Commands: :state, :history, :reset, :quit\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("[{}] > ", engine.current());
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            Input::Quit => break,
            Input::State => println!(
                "Current state: {} (tasks completed: {})",
                engine.current(),
                engine.tasks_completed()
            ),
            Input::History => {
                let history = engine.history();
                if history.is_empty() {
                    println!("No transitions yet.");
                }
                for event in history {
                    println!(
                        "  {} {} -> {} ({})",
                        event.timestamp.format("%H:%M:%S"),
                        event.from,
                        event.to,
                        event.trigger
                    );
                }
            }
            Input::Reset => {
                engine.reset();
                println!("Engine restarted. Current state: {}", engine.current());
            }
            Input::Trigger(trigger) => {
                let outcome = engine.process(trigger);
                print_outcome(&outcome, json)?;
            }
        }
    }

    Ok(())
}

fn known_triggers(engine: &Engine) -> String {
    let mut triggers: Vec<&str> = engine
        .table()
        .states
        .values()
        .flat_map(|rules| rules.transitions.keys().map(String::as_str))
        .collect();
    triggers.sort_unstable();
    triggers.dedup();
    triggers.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input(":state\n"), Input::State);
        assert_eq!(parse_input(" :history "), Input::History);
        assert_eq!(parse_input(":reset"), Input::Reset);
        assert_eq!(parse_input(":exit"), Input::Quit);
    }

    #[test]
    fn test_parse_trigger_passthrough() {
        assert_eq!(parse_input("Start_Task\n"), Input::Trigger("Start_Task"));
        assert_eq!(parse_input("\n"), Input::Trigger(""));
    }

    #[test]
    fn test_known_triggers() {
        let engine = Engine::new();
        assert_eq!(
            known_triggers(&engine),
            "end_shift, force_stop, reset, start_task, task_complete"
        );
    }
}
