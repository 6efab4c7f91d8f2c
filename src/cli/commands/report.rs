use crate::cli::core::{parse_count, parse_month, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::table::{Column, Table};
use crate::core::{aggregation::CategoryTotal, services::ReportService};

use super::{goal::render_goals, transaction::render_transactions, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "report",
            "Monthly income/expense trend or ranked category spending",
            "report <trend [months] | categories [YYYY-MM]>",
            cmd_report,
        ),
        CommandDefinition::new(
            "summary",
            "Dashboard: this month's totals, recent activity and goals",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        context.print_usage("report");
        return Ok(());
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "trend" => show_trend(context, rest),
        "categories" => show_categories(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown report `{other}`"
        ))),
    }
}

fn show_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window = match args.first() {
        Some(raw) => parse_count(raw)?,
        None => context.config.trend_months,
    };
    let points = ReportService::monthly_trend(
        &*context.store,
        &*context.clock,
        window,
        context.config.trend_stepping,
    )?;

    output::section(format!("Trend over {window} month(s)"));
    let mut table = Table::new(vec![
        Column::left("Month"),
        Column::right("Income"),
        Column::right("Expense"),
        Column::right("Savings"),
    ]);
    for point in &points {
        table.push(vec![
            point.month.clone(),
            output::amount(point.income),
            output::amount(point.expense),
            output::amount(point.savings),
        ]);
    }
    output::line(table.render());
    Ok(())
}

fn show_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = match args.first() {
        Some(raw) => parse_month(raw)?,
        None => context.current_month(),
    };
    let breakdown = ReportService::category_breakdown(&*context.store, &month)?;
    output::section(format!("Spending by category for {month}"));
    if breakdown.is_empty() {
        output::info("No expenses recorded for this month.");
        return Ok(());
    }
    output::line(render_category_totals(&breakdown));
    Ok(())
}

fn render_category_totals(totals: &[CategoryTotal]) -> String {
    let mut table = Table::new(vec![
        Column::left("Category").capped(20),
        Column::right("Spent"),
    ]);
    for entry in totals {
        table.push(vec![entry.category.clone(), output::amount(entry.total)]);
    }
    table.render()
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = ReportService::dashboard(
        &*context.store,
        &*context.clock,
        context.config.recent_limit,
    )?;

    output::section(format!("Summary for {}", summary.month));
    output::line(format!("  Income : {}", output::amount(summary.totals.income)));
    output::line(format!("  Expense: {}", output::amount(summary.totals.expense)));
    output::line(format!("  Balance: {}", output::amount(summary.totals.balance)));

    if !summary.expense_by_category.is_empty() {
        output::section("Spending this month");
        output::line(render_category_totals(&summary.expense_by_category));
    }
    if !summary.recent.is_empty() {
        output::section("Recent transactions");
        output::line(render_transactions(&summary.recent));
    }
    if !summary.goals.is_empty() {
        output::section("Savings goals");
        output::line(render_goals(&summary.goals));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::{run, script_context};

    #[test]
    fn reports_run_against_a_populated_ledger() {
        let (mut context, _dir) = script_context();
        run(
            &mut context,
            &[
                "add income Salary 3000 2024-06-01",
                "add expense Rent 1200 2024-06-02",
                "goal add Holiday 800",
                "report trend",
                "report trend 0",
                "report categories",
                "report categories 2024-05",
                "summary",
            ],
        )
        .unwrap();
    }

    #[test]
    fn bad_window_is_an_argument_error() {
        let (mut context, _dir) = script_context();
        assert!(context.process_line("report trend six").is_err());
        assert!(context.process_line("report forecast").is_err());
    }

    #[test]
    fn oversized_window_fails_without_ending_the_session() {
        let (mut context, _dir) = script_context();
        run(&mut context, &["add expense Food 12 2024-06-03"]).unwrap();
        assert!(context.process_line("report trend 4000000").is_err());

        run(&mut context, &["config set trend_months 4000000"]).unwrap();
        assert!(context.process_line("report trend").is_err());
        run(&mut context, &["report trend 3", "summary"]).unwrap();
    }
}
