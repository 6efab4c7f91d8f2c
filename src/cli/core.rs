//! Shell context construction, dispatch and argument parsing.

use std::io;

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::ServiceError,
        time::{month_label, Clock, SystemClock},
    },
    errors::LedgerError,
    storage::LedgerStore,
};

use super::commands::{self, CommandRegistry};
use super::help;
use super::output;
use super::shell::parse_command_line;
pub use super::shell_context::{CliMode, ShellContext};

const DATE_FORMAT: &str = "%Y-%m-%d";
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(err) => CommandError::Ledger(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Failures that end the shell session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

impl ShellContext {
    /// Loads the persisted configuration and opens the configured store.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = config.open_store(config_manager.base_dir())?;
        Ok(Self::with_store(
            mode,
            config_manager,
            config,
            store,
            Box::new(SystemClock),
        ))
    }

    pub fn with_store(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        store: Box<dyn LedgerStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            store,
            clock,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!("finance[{}]> ", self.store.backend_name())
    }

    pub(crate) fn current_month(&self) -> String {
        month_label(self.clock.today())
    }

    /// Tokenizes and runs one input line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.closest_command(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    /// Prints a command failure; the session keeps running.
    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    pub(crate) fn print_usage(&self, command: &str) {
        if let Some(definition) = self.registry.get(command) {
            help::print_command(definition);
        }
    }
}

pub(crate) fn required<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}

fn parse_number(input: &str, what: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {what} `{input}`")))
}

/// Non-negative decimal amount.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let value = parse_number(input, "amount")?;
    if value < 0.0 {
        return Err(CommandError::InvalidArguments(format!(
            "amount must not be negative: `{input}`"
        )));
    }
    Ok(value)
}

/// Signed adjustment, as used for goal progress.
pub(crate) fn parse_delta(input: &str) -> Result<f64, CommandError> {
    parse_number(input, "amount")
}

pub(crate) fn parse_id(input: &str) -> Result<i64, CommandError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid id `{input}`")))
}

pub(crate) fn parse_count(input: &str) -> Result<usize, CommandError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid count `{input}`")))
}

/// Validates a calendar date and returns it in canonical `YYYY-MM-DD` form.
pub(crate) fn parse_date(input: &str) -> Result<String, CommandError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
        })
}

/// Validates a month and returns it in canonical `YYYY-MM` form.
pub(crate) fn parse_month(input: &str) -> Result<String, CommandError> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), DATE_FORMAT)
        .map(month_label)
        .map_err(|_| {
            CommandError::InvalidArguments(format!("invalid month `{input}` (use YYYY-MM)"))
        })
}


#[cfg(test)]
mod tests {
    use super::test_support::{run, script_context};
    use super::*;
    use crate::storage::LedgerReader;

    #[test]
    fn dates_are_validated_and_canonicalized() {
        assert_eq!(parse_date("2024-1-5").unwrap(), "2024-01-05");
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(parse_month("2024-3").unwrap(), "2024-03");
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn amounts_reject_text_and_negatives() {
        assert_eq!(parse_amount("12.5").unwrap(), 12.5);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-4").is_err());
        assert!(parse_amount("NaN").is_err());
        assert_eq!(parse_delta("-100").unwrap(), -100.0);
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn unknown_command_suggests_the_closest_name() {
        let (context, _dir) = script_context();
        assert_eq!(context.closest_command("budgte"), Some("budget"));
        assert_eq!(context.closest_command("xyzzyplugh"), None);
    }

    #[test]
    fn exit_stops_the_session() {
        let (mut context, _dir) = script_context();
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn unbalanced_quotes_are_reported_not_fatal() {
        let (mut context, _dir) = script_context();
        run(&mut context, &["add expense \"Food 10 2024-06-01"]).unwrap();
        assert!(context.store.transactions().unwrap().is_empty());
        assert!(context.running);
    }
}
