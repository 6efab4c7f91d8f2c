use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::storage::json_backend::SNAPSHOT_SCHEMA_VERSION;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
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

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Finance Core {}", meta.version));
    output::line(format!("  Backend      : {}", context.store.backend_name()));
    output::line(format!("  Snapshot ver : v{SNAPSHOT_SCHEMA_VERSION}"));
    output::line(format!("  Build hash   : {} ({})", meta.git_hash, meta.git_status));
    output::line(format!("  Built at     : {}", meta.timestamp));
    output::line(format!("  Target       : {}", meta.target));
    output::line(format!("  Profile      : {}", meta.profile));
    output::line(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(definition) => help::print_command(definition),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::{run, script_context};

    #[test]
    fn informational_commands_succeed() {
        let (mut context, _dir) = script_context();
        run(&mut context, &["version", "help", "help budget", "help nosuch"]).unwrap();
        assert!(context.running);
    }
}
