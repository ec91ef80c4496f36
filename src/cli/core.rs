//! Shell context, dispatch, and CLI error types.

use std::{env, io, sync::Arc, time::Duration};

use chrono::{Local, NaiveDate};
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    errors::TrackerError,
    session::Session,
    storage::JsonStore,
};

use super::{commands, io as cli_io, output};

/// Fatal shell failures that end the CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Per-command failures, reported and recovered from within the loop.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Failed(String),
}

impl From<TrackerError> for CommandError {
    fn from(err: TrackerError) -> Self {
        CommandError::Failed(err.to_string())
    }
}

impl From<dialoguer::Error> for CommandError {
    fn from(err: dialoguer::Error) -> Self {
        CommandError::Failed(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub session: Session,
    pub config: Config,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = match ConfigManager::new().load() {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to load config, using defaults: {err}");
                Config::default()
            }
        };
        let store = JsonStore::new(config.resolved_data_dir().join("ledger.json"));
        let session = Session::open(
            Arc::new(store),
            Duration::from_millis(config.autosave_delay_ms),
        );
        Ok(Self {
            mode,
            running: true,
            session,
            config,
        })
    }

    pub fn prompt(&self) -> String {
        "spendtrack> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        commands::COMMANDS.iter().map(|c| c.name).collect()
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match commands::COMMANDS.iter().find(|c| c.name == command) {
            Some(entry) => (entry.handler)(self, args),
            None => {
                self.suggest_command(command);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = commands::COMMANDS
            .iter()
            .map(|entry| (levenshtein(entry.name, input), entry.name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit spendtrack?", true)
            .map_err(|err| CliError::Io(io::Error::other(err.to_string())))
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::Usage(message) => output::warning(message),
            CommandError::Failed(message) => output::error(message),
        }
    }

    /// Resolves a full or prefixed commitment id against the current ledger.
    pub fn resolve_commitment_id(&self, input: &str) -> Result<Uuid, CommandError> {
        if let Ok(id) = input.parse::<Uuid>() {
            return Ok(id);
        }
        let needle = input.to_ascii_lowercase();
        let matches: Vec<Uuid> = self
            .session
            .ledger()
            .commitments
            .iter()
            .filter(|c| c.id.to_string().starts_with(&needle))
            .map(|c| c.id)
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(CommandError::Failed(format!(
                "no commitment matches id `{}`",
                input
            ))),
            _ => Err(CommandError::Failed(format!(
                "id prefix `{}` is ambiguous ({} matches)",
                input,
                matches.len()
            ))),
        }
    }

    /// Reference date for commands that accept an optional date argument.
    pub fn reference_date(&self, arg: Option<&str>) -> Result<NaiveDate, CommandError> {
        match arg {
            Some(raw) => parse_date(raw),
            None => Ok(Local::now().date_naive()),
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CommandError::Usage(format!("`{}` is not a date (expected YYYY-MM-DD)", raw)))
}

pub fn script_mode_requested() -> bool {
    env::var_os("SPENDTRACK_CLI_SCRIPT").is_some()
}
