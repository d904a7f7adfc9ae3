use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, history::DefaultHistory, Cmd, Editor, KeyEvent};

use crate::cli::completion::LedgerCompleter;
use crate::cli::core::{CliError, CliMode, ShellContext};
use crate::cli::output;

/// When set, commands are read line by line from stdin without a prompt.
pub const SCRIPT_ENV: &str = "EXPENSEFLOW_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<LedgerCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(LedgerCompleter::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("ExpenseFlow");
    output::info("Type `help` to list commands.");

    while context.running {
        if let Some(completer) = editor.helper_mut() {
            completer.set_members(context.session().ledger().members());
        }

        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let entry = line.trim();
                if !entry.is_empty() {
                    editor.add_history_entry(entry).ok();
                }
                execute(context, entry)?;
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        execute(context, &line?)?;
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Command failures are reported and the shell keeps reading.
fn execute(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    match context.process_line(line) {
        Ok(_) => Ok(()),
        Err(err) => context.report_error(err),
    }
}
