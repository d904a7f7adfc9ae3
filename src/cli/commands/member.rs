use super::{joined, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "member",
            "Add or remove a group member",
            "member <add|remove> <name>",
            cmd_member,
        ),
        CommandDefinition::new("members", "List group members", "members", cmd_members),
    ]
}

fn cmd_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: member <add|remove> <name>".into(),
        ));
    };
    let name = joined(rest).ok_or_else(|| {
        CommandError::InvalidArguments(format!("usage: member {} <name>", subcommand))
    })?;

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => {
            let name = context.session_mut().add_member(&name)?;
            output::success(format!("Added member `{}`.", name));
            Ok(())
        }
        "remove" | "rm" => {
            let removal = context.session_mut().remove_member(&name)?;
            output::success(format!("Removed member `{}`.", removal.member));
            let removed = removal.expenses_removed();
            if removed > 0 {
                output::info(format!(
                    "Deleted {} expense(s): {} paid by `{}`, {} left with nobody to split.",
                    removed,
                    removal.paid_expenses_removed,
                    removal.member,
                    removal.emptied_expenses_removed
                ));
            }
            if removal.splits_pruned > 0 {
                output::info(format!(
                    "Removed `{}` from {} other split(s).",
                    removal.member, removal.splits_pruned
                ));
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown member subcommand `{}`",
            other
        ))),
    }
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let members = context.session().ledger().members();
    output::section("Members");
    if members.is_empty() {
        output::info("Add members to get started");
        return Ok(());
    }
    for name in members {
        output::detail(name);
    }
    Ok(())
}
