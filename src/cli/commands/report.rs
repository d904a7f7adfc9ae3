//! Read-only views over the settlement report, plus export.

use std::path::Path;

use expenseflow_core::SettlementReport;

use super::{joined, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "balances",
            "Show each member's net balance",
            "balances",
            cmd_balances,
        ),
        CommandDefinition::new(
            "settle",
            "Show the transfers that settle everyone up",
            "settle",
            cmd_settle,
        ),
        CommandDefinition::new(
            "summary",
            "Show members, total spent, balances, and settlements",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "export",
            "Write a JSON snapshot (default: expenseflow-YYYY-MM-DD.json in the export dir)",
            "export [path]",
            cmd_export,
        ),
    ]
}

fn has_activity(context: &ShellContext) -> bool {
    let ledger = context.session().ledger();
    !ledger.members().is_empty() && !ledger.expenses().is_empty()
}

fn cmd_balances(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Balances");
    if !has_activity(context) {
        output::info("Add members and expenses to see balances");
        return Ok(());
    }
    let report = context.session().report()?;
    print_balances(context, &report);
    Ok(())
}

fn cmd_settle(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Settlements");
    if !has_activity(context) {
        output::info("Add expenses to see settlements");
        return Ok(());
    }
    let report = context.session().report()?;
    print_settlements(context, &report);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let ledger = context.session().ledger();
    output::section("Summary");
    if ledger.members().is_empty() {
        output::info("Add members to get started");
        return Ok(());
    }
    output::detail(format!("Members : {}", ledger.members().join(", ")));
    output::detail(format!("Expenses: {}", ledger.expense_count()));
    output::detail(format!("Total   : {}", money.amount(ledger.total())));

    if ledger.expenses().is_empty() {
        return Ok(());
    }
    let report = context.session().report()?;
    output::section("Balances");
    print_balances(context, &report);
    output::section("Settlements");
    print_settlements(context, &report);
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = joined(args);
    let path = context.session().export(target.as_deref().map(Path::new))?;
    output::success(format!("Exported ledger to {}", path.display()));
    Ok(())
}

fn print_balances(context: &ShellContext, report: &SettlementReport) {
    let money = context.money();
    let engine = context.session().engine();
    let tolerance = engine.policy().tolerance();
    let width = report
        .balances
        .iter()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(0);
    for entry in report.balances.iter() {
        let text = money.balance(entry.amount, engine.classify(entry.amount));
        output::detail(format!(
            "{:<width$}  {}",
            entry.name,
            output::balance_text(text, entry.amount, tolerance),
            width = width
        ));
    }
}

fn print_settlements(context: &ShellContext, report: &SettlementReport) {
    if report.settlements.is_empty() {
        output::info("All settled up!");
        return;
    }
    let money = context.money();
    for settlement in &report.settlements {
        output::detail(money.settlement(settlement));
    }
}
