use super::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{help, output};

const BUILD_HASH: &str = env!("EXPENSEFLOW_BUILD_HASH");
const BUILD_TIMESTAMP: &str = env!("EXPENSEFLOW_BUILD_TIMESTAMP");
const BUILD_PROFILE: &str = env!("EXPENSEFLOW_BUILD_PROFILE");

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "clear",
            "Remove every member and expense",
            "clear",
            cmd_clear,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Clear all members and expenses?")? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    context.session_mut().clear()?;
    output::success("Cleared all members and expenses.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("ExpenseFlow {}", env!("CARGO_PKG_VERSION")));
    output::detail(format!("Build hash : {}", BUILD_HASH));
    output::detail(format!("Built at   : {}", BUILD_TIMESTAMP));
    output::detail(format!("Profile    : {}", BUILD_PROFILE));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(command) => help::print_command(command),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(context.registry());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;

    #[test]
    fn clear_in_script_mode_skips_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let app = process_script(
            dir.path(),
            &["member add A", "expense add Tea 3 A", "clear"],
        )
        .unwrap();
        assert!(app.session().ledger().is_empty());
    }
}
