use std::path::Path;

use crate::cli::core::{required, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::storage::{load_snapshot_from_path, save_snapshot_to_path, MemoryStore};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "export",
            "Write every record and the id counters to a JSON snapshot",
            "export <path>",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            "Replace the in-memory ledger with a JSON snapshot",
            "import <path>",
            cmd_import,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "export <path>")?);
    let snapshot = context.store.snapshot()?;
    save_snapshot_to_path(&snapshot, path)?;
    output::success(format!(
        "Exported {} transaction(s), {} budget(s) and {} goal(s) to {}.",
        snapshot.transactions.len(),
        snapshot.budgets.len(),
        snapshot.goals.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(required(args, 0, "import <path>")?);
    if context.store.backend_name() != MemoryStore::BACKEND_NAME {
        return Err(CommandError::Message(format!(
            "import is only available with the memory backend (current: {})",
            context.store.backend_name()
        )));
    }
    let snapshot = load_snapshot_from_path(path)?;
    let policy = context.config.missing_id_policy();
    let store = MemoryStore::from_snapshot(snapshot, policy);
    context.store = Box::new(store);
    output::success(format!("Imported ledger from {}.", path.display()));
    Ok(())
}
