use expenseflow_config::Config;

use super::{joined, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            let (Some(key), Some(value)) = (args.get(1), args.get(2..).and_then(joined)) else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            };
            context.session_mut().update_config(key, &value)?;
            context.apply_output_preferences();
            output::success(format!("Set {} = {}.", key, value));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show|set <key> <value>]".into(),
        )),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = context.session().config();
    output::section("Configuration");
    for key in Config::KEYS {
        if let Some(value) = config.get(key) {
            output::detail(format!("{:<22} {}", key, value));
        }
    }
    Ok(())
}
