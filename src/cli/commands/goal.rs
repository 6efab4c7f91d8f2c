use crate::cli::core::{
    parse_amount, parse_date, parse_delta, parse_id, required, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::output;
use crate::cli::table::{Column, Table};
use crate::core::{filter::criterion, services::SavingsService};
use crate::ledger::{NewGoal, SavingsGoal};

use super::CommandDefinition;

const ADD_USAGE: &str = "goal add <name> <target> [current] [YYYY-MM-DD deadline]";
const UPDATE_USAGE: &str = "goal update <id> <delta>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "goal",
        "Manage savings goals",
        "goal <add <name> <target> [current] [deadline] | list | update <id> <delta> | delete <id>>",
        cmd_goal,
    )]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        context.print_usage("goal");
        return Ok(());
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_goal(context, rest),
        "list" => list_goals(context),
        "update" => update_goal(context, rest),
        "delete" => delete_goal(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown goal subcommand `{other}`"
        ))),
    }
}

fn add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = required(args, 0, ADD_USAGE)?;
    let target = parse_amount(required(args, 1, ADD_USAGE)?)?;
    let mut draft = NewGoal::new(name, target);
    if let Some(current) = args.get(2).copied().and_then(criterion) {
        draft = draft.with_current(parse_delta(current)?);
    }
    if let Some(deadline) = args.get(3).copied().and_then(criterion) {
        draft = draft.with_deadline(parse_date(deadline)?);
    }

    let goal = SavingsService::add(&mut *context.store, draft)?;
    output::success(format!(
        "Created goal #{} `{}` targeting {}.",
        goal.id,
        goal.name,
        output::amount(goal.target_amount)
    ));
    Ok(())
}

fn list_goals(context: &mut ShellContext) -> CommandResult {
    let goals = SavingsService::list(&*context.store)?;
    if goals.is_empty() {
        output::info("No savings goals yet.");
        return Ok(());
    }
    output::section("Savings goals");
    output::line(render_goals(&goals));
    Ok(())
}

fn update_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(required(args, 0, UPDATE_USAGE)?)?;
    let delta = parse_delta(required(args, 1, UPDATE_USAGE)?)?;
    if SavingsService::update_amount(&mut *context.store, id, delta)? {
        output::success(format!(
            "Goal #{id} adjusted by {}.",
            output::amount(delta)
        ));
    } else {
        output::info(format!("No goal #{id}; nothing updated."));
    }
    Ok(())
}

fn delete_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(required(args, 0, "goal delete <id>")?)?;
    if SavingsService::delete(&mut *context.store, id)? {
        output::success(format!("Deleted goal #{id}."));
    } else {
        output::info(format!("No goal #{id}; nothing deleted."));
    }
    Ok(())
}

pub(crate) fn render_goals(goals: &[SavingsGoal]) -> String {
    let mut table = Table::new(vec![
        Column::right("Id"),
        Column::left("Name").capped(24),
        Column::right("Saved"),
        Column::right("Target"),
        Column::right("Progress"),
        Column::left("Deadline"),
    ]);
    for goal in goals {
        table.push(vec![
            goal.id.to_string(),
            goal.name.clone(),
            output::amount(goal.current_amount),
            output::amount(goal.target_amount),
            output::percentage(SavingsService::progress(goal)),
            goal.deadline.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.render()
}
