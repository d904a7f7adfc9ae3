use expenseflow_domain::ExpenseId;

use super::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

const ADD_USAGE: &str = "usage: expense add <description> <amount> <payer> [split...]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "expense",
            "Record or delete an expense",
            "expense add <description> <amount> <payer> [split...] | expense remove <id>",
            cmd_expense,
        ),
        CommandDefinition::new(
            "expenses",
            "List expenses and the running total",
            "expenses",
            cmd_expenses,
        ),
    ]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense <add|remove> ...".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_expense(context, rest),
        "remove" | "rm" => {
            let raw = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: expense remove <id>".into())
            })?;
            let id = parse_id(raw)?;
            let removed = context.session_mut().remove_expense(id)?;
            output::success(format!(
                "Removed expense #{} ({}).",
                removed.id, removed.description
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{}`",
            other
        ))),
    }
}

fn add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [description, amount, payer, split @ ..] = args else {
        return Err(CommandError::InvalidArguments(ADD_USAGE.into()));
    };
    let amount = parse_amount(amount, &context.session().config().currency_symbol)?;

    let ledger = context.session().ledger();
    let split: Vec<String> = if split.is_empty() {
        ledger.members().to_vec()
    } else {
        split.iter().map(|name| name.to_string()).collect()
    };
    if let Some(unknown) = std::iter::once(*payer)
        .chain(split.iter().map(String::as_str))
        .find(|name| !ledger.contains_member(name.trim()))
    {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not a member; add them with `member add`",
            unknown
        )));
    }

    let id = context
        .session_mut()
        .add_expense(description, amount, payer, &split)?;
    let money = context.money();
    output::success(format!(
        "Added expense #{}: {} {} paid by {}.",
        id,
        description.trim(),
        money.amount(amount),
        payer.trim()
    ));
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let ledger = context.session().ledger();
    output::section("Expenses");
    if ledger.expenses().is_empty() {
        output::info("No expenses yet. Add one with `expense add`.");
        return Ok(());
    }
    for expense in ledger.expenses() {
        output::detail(money.expense(expense));
    }
    output::detail(format!("Total: {}", money.amount(ledger.total())));
    Ok(())
}

/// Accepts `12.5`, `12.50`, or `$12.50` with the configured symbol.
pub(crate) fn parse_amount(raw: &str, symbol: &str) -> Result<f64, CommandError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(symbol).unwrap_or(trimmed);
    digits
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a valid amount", raw)))
}

fn parse_id(raw: &str) -> Result<ExpenseId, CommandError> {
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(ExpenseId)
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not an expense id", raw)))
}
