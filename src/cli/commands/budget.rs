use crate::cli::core::{
    parse_amount, parse_month, required, CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::table::{Column, Table};
use crate::core::services::{BudgetService, BudgetStatus};

use super::CommandDefinition;

const SET_USAGE: &str = "budget set <category> <amount> [YYYY-MM]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "budget",
        "Set monthly category budgets and track spending against them",
        "budget <set <category> <amount> [YYYY-MM] | status [YYYY-MM]>",
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        context.print_usage("budget");
        return Ok(());
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "set" => set_budget(context, rest),
        "status" => show_status(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{other}`"
        ))),
    }
}

/// Month argument at `index`, or the clock's current month when omitted.
fn month_arg(context: &ShellContext, args: &[&str], index: usize) -> Result<String, CommandError> {
    match args.get(index) {
        Some(raw) => parse_month(raw),
        None => Ok(context.current_month()),
    }
}

fn set_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = required(args, 0, SET_USAGE)?;
    let amount = parse_amount(required(args, 1, SET_USAGE)?)?;
    let month = month_arg(context, args, 2)?;
    let budget = BudgetService::set(&mut *context.store, category, amount, &month)?;
    output::success(format!(
        "Budget #{} for {} in {} set to {}.",
        budget.id,
        budget.category,
        budget.month,
        output::amount(budget.amount)
    ));
    Ok(())
}

fn show_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args, 0)?;
    let statuses = BudgetService::status(&*context.store, &month)?;
    output::section(format!("Budgets for {month}"));
    if statuses.is_empty() {
        output::info("No budgets set for this month.");
        return Ok(());
    }
    output::line(render_status(&statuses));
    let over: Vec<&str> = statuses
        .iter()
        .filter(|status| status.is_over())
        .map(|status| status.category.as_str())
        .collect();
    if !over.is_empty() {
        output::warning(format!("Over budget: {}", over.join(", ")));
    }
    Ok(())
}

fn render_status(statuses: &[BudgetStatus]) -> String {
    let mut table = Table::new(vec![
        Column::left("Category").capped(20),
        Column::right("Budget"),
        Column::right("Spent"),
        Column::right("Remaining"),
        Column::right("Used"),
    ]);
    for status in statuses {
        table.push(vec![
            status.category.clone(),
            output::amount(status.budget),
            output::amount(status.spent),
            output::amount(status.remaining),
            output::percentage(status.percentage),
        ]);
    }
    table.render()
}
