use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trigger_engine::{Engine, EngineConfig, TriggerOutcome};

mod console;

const DEMO_TRIGGERS: [&str; 7] = [
    "start_task",
    "status_check",
    "task_complete",
    "reset",
    "start_task",
    "end_shift",
    "start_task",
];

#[derive(Parser, Debug)]
#[command(name = "trigger-engine", version, about = "Drive the trigger engine state machine")]
struct Cli {
    /// YAML engine config (verbosity, history bound, transition table)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log engine notices at debug level instead of info
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Print each outcome as a JSON line
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Replay the built-in lifecycle sequence
    Demo {
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
    /// Read triggers from stdin, one per line
    Run,
}

impl Default for Command {
    fn default() -> Self {
        Command::Demo { delay_ms: 500 }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trigger_engine=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or_default() {
        Command::Demo { delay_ms } => {
            let engine = Engine::with_config(config)?;
            run_demo(&engine, Duration::from_millis(delay_ms), cli.json)
        }
        Command::Run => {
            let engine = Engine::with_config(config)?
                .with_listener(Arc::new(console::ConsoleListener));
            console::run(&engine, cli.json)
        }
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.quiet {
        config.verbose = false;
    }
    Ok(config)
}

fn run_demo(engine: &Engine, delay: Duration, json: bool) -> Result<()> {
    for (i, trigger) in DEMO_TRIGGERS.iter().enumerate() {
        if i > 0 {
            thread::sleep(delay);
        }
        let outcome = engine.process(trigger);
        print_outcome(&outcome, json)?;
    }
    tracing::info!(
        state = %engine.current(),
        tasks_completed = engine.tasks_completed(),
        "Demo finished"
    );
    Ok(())
}

pub(crate) fn print_outcome(outcome: &TriggerOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!("Response: {}", outcome.response);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigger_engine::State;

    #[test]
    fn test_default_command_is_demo() {
        let cli = Cli::try_parse_from(["trigger-engine"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Command::Demo { delay_ms: 500 });
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from(["trigger-engine", "run", "--quiet", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Command::Run));
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_quiet_disables_verbose() {
        let cli = Cli::try_parse_from(["trigger-engine", "-q"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert!(!config.verbose);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let cli = Cli::try_parse_from(["trigger-engine", "--config", "/nonexistent.yaml"]).unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("/nonexistent.yaml"));
    }

    #[test]
    fn test_demo_sequence_outcome() {
        let engine = Engine::with_config(EngineConfig::quiet()).unwrap();
        run_demo(&engine, Duration::ZERO, false).unwrap();
        assert_eq!(engine.current(), State::Active);
        assert_eq!(engine.tasks_completed(), 1);
    }
}
