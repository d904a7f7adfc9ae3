//! Core CLI loop state, dispatch, and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::debug;

use crate::{
    errors::AppError,
    session::Session,
    utils::paths,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::formatting::MoneyFormat;
use super::output::{self, OutputPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// User-facing CLI error wrapper.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<expenseflow_core::CoreError> for CommandError {
    fn from(err: expenseflow_core::CoreError) -> Self {
        CommandError::App(err.into())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

pub struct ShellContext {
    mode: CliMode,
    registry: CommandRegistry,
    session: Session,
    theme: ColorfulTheme,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens the session under `EXPENSEFLOW_HOME` (or `~/.expenseflow`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let session = Session::open(&paths::app_data_dir())?;
        Ok(Self::with_session(mode, session))
    }

    pub fn with_session(mode: CliMode, session: Session) -> Self {
        let context = Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub(crate) fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn money(&self) -> MoneyFormat {
        MoneyFormat::new(self.session.config().currency_symbol.clone())
    }

    pub(crate) fn prompt(&self) -> String {
        let ledger = self.session.ledger();
        format!(
            "expenseflow [{}m/{}e]> ",
            ledger.member_count(),
            ledger.expense_count()
        )
    }

    /// Script mode never colours output so piped stdout stays plain.
    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.mode == CliMode::Interactive
                && self.session.config().ui_color_enabled,
        });
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            debug!(command, args = args.len(), "dispatching command");
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

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Asks before a destructive action; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::App(err) if err.is_benign() => {
                output::info(err);
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    /// Tokenizes and runs one input line. `#` starts a comment line.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let session = Session::open(base)?;
    let mut app = ShellContext::with_session(CliMode::Script, session);
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expenseflow_domain::Settlement;

    #[test]
    fn script_builds_ledger_and_settles() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(
            dir.path(),
            &[
                "member add A",
                "member add B",
                "member add C",
                "expense add \"Team dinner\" 90 A",
            ],
        )
        .unwrap();

        let report = app.session().report().unwrap();
        assert_eq!(
            report.settlements,
            vec![
                Settlement::new("B", "A", 30.0),
                Settlement::new("C", "A", 30.0)
            ]
        );
        assert_eq!(
            app.session().ledger().expenses()[0].description,
            "Team dinner"
        );
    }

    #[test]
    fn exit_stops_processing() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(dir.path(), &["member add A", "exit", "member add B"]).unwrap();
        assert_eq!(app.session().ledger().members(), ["A".to_string()]);
        assert!(!app.running);
    }

    #[test]
    fn comments_blanks_and_bad_quoting_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path(), &[]).unwrap();
        for line in ["# member add A", "   ", "member add \"Ana"] {
            assert_eq!(app.process_line(line).unwrap(), LoopControl::Continue);
        }
        assert!(app.session().ledger().members().is_empty());
        assert!(app.running);
    }

    #[test]
    fn invalid_arguments_surface_as_command_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path(), &[]).unwrap();
        let err = app.process_line("expense add Lunch abc A").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));

        let err = app.process_line("member remove Nobody").unwrap_err();
        assert!(matches!(err, CommandError::App(ref inner) if inner.is_benign()));
        assert!(app.report_error(err).is_ok());
    }

    #[test]
    fn unknown_commands_do_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = process_script(dir.path(), &[]).unwrap();
        assert_eq!(app.process_line("memberz").unwrap(), LoopControl::Continue);
    }
}
