use crate::cli::core::{
    parse_amount, parse_date, parse_id, required, CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::table::{Column, Table};
use crate::core::{
    filter::{criterion, TransactionFilter},
    services::TransactionService,
};
use crate::ledger::{NewTransaction, Transaction, TransactionKind};

use super::CommandDefinition;

const ADD_USAGE: &str = "add <income|expense> <category> <amount> <YYYY-MM-DD> [description...]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandDefinition::new("delete", "Delete a transaction by id", "delete <id>", cmd_delete),
        CommandDefinition::new(
            "list",
            "List transactions, most recent first (`all` or `-` skips a criterion)",
            "list [type] [category] [start YYYY-MM-DD] [end YYYY-MM-DD]",
            cmd_list,
        ),
        CommandDefinition::new(
            "categories",
            "Show every category used by a transaction",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = required(args, 0, ADD_USAGE)?
        .parse::<TransactionKind>()
        .map_err(CommandError::InvalidArguments)?;
    let category = required(args, 1, ADD_USAGE)?;
    let amount = parse_amount(required(args, 2, ADD_USAGE)?)?;
    let date = parse_date(required(args, 3, ADD_USAGE)?)?;
    let description = args.get(4..).unwrap_or_default().join(" ");

    let draft = NewTransaction::new(kind, category, amount, date).with_description(description);
    let stored = TransactionService::add(&mut *context.store, draft)?;
    output::success(format!(
        "Recorded {} #{}: {} {} on {}.",
        stored.kind,
        stored.id,
        stored.category,
        output::amount(stored.amount),
        stored.date
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(required(args, 0, "delete <id>")?)?;
    if TransactionService::delete(&mut *context.store, id)? {
        output::success(format!("Deleted transaction #{id}."));
    } else {
        output::info(format!("No transaction #{id}; nothing deleted."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let arg = |idx: usize| args.get(idx).copied().unwrap_or_default();
    let start = criterion(arg(2)).map(parse_date).transpose()?;
    let end = criterion(arg(3)).map(parse_date).transpose()?;
    let filter = TransactionFilter::from_query(
        arg(0),
        arg(1),
        start.as_deref().unwrap_or_default(),
        end.as_deref().unwrap_or_default(),
    )
    .map_err(CommandError::InvalidArguments)?;

    let transactions = TransactionService::list(&*context.store, &filter)?;
    if transactions.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }
    output::line(render_transactions(&transactions));
    output::info(format!("{} transaction(s).", transactions.len()));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let categories = TransactionService::categories(&*context.store)?;
    if categories.is_empty() {
        output::info("No categories yet.");
        return Ok(());
    }
    output::section("Categories");
    for category in categories {
        output::line(format!("  {category}"));
    }
    Ok(())
}

pub(crate) fn render_transactions(transactions: &[Transaction]) -> String {
    let mut table = Table::new(vec![
        Column::right("Id"),
        Column::left("Date"),
        Column::left("Type"),
        Column::left("Category").capped(20),
        Column::right("Amount"),
        Column::left("Description").capped(32),
    ]);
    for txn in transactions {
        table.push(vec![
            txn.id.to_string(),
            txn.date.clone(),
            txn.kind.to_string(),
            txn.category.clone(),
            output::amount(txn.amount),
            txn.description.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}
