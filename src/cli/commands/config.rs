use std::path::PathBuf;

use crate::cli::core::{parse_count, required, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::config::BackendKind;
use crate::core::time::TrendStepping;

use super::CommandDefinition;

const SET_USAGE: &str = concat!(
    "config set <backend|database_path|strict_ids|trend_months|trend_stepping|recent_limit>",
    " <value>"
);

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View or change persisted preferences",
        "config [show | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|sub| sub.to_ascii_lowercase()) {
        None => show_config(context),
        Some(sub) if sub == "show" => show_config(context),
        Some(sub) if sub == "set" => {
            let key = required(args, 1, SET_USAGE)?;
            let value = required(args, 2, SET_USAGE)?;
            set_config_value(context, key, value)
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    output::section("Configuration");
    output::line(format!("  file: {}", context.config_manager.path().display()));
    let json = serde_json::to_string_pretty(&context.config)
        .map_err(|err| CommandError::Message(err.to_string()))?;
    output::line(json);
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "expected true or false, got `{value}`"
        ))),
    }
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut restart_needed = false;
    let config = &mut context.config;
    match key.to_ascii_lowercase().as_str() {
        "backend" => {
            config.backend = match value.to_ascii_lowercase().as_str() {
                "memory" => BackendKind::Memory,
                "sqlite" => BackendKind::Sqlite,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown backend `{other}` (memory or sqlite)"
                    )))
                }
            };
            restart_needed = true;
        }
        "database_path" => {
            config.database_path = Some(PathBuf::from(value));
            restart_needed = true;
        }
        "strict_ids" => {
            config.strict_ids = parse_bool(value)?;
            restart_needed = true;
        }
        "trend_months" => config.trend_months = parse_count(value)?,
        "recent_limit" => config.recent_limit = parse_count(value)?,
        "trend_stepping" => {
            config.trend_stepping = match value.to_ascii_lowercase().as_str() {
                "thirty_day" | "30" => TrendStepping::ThirtyDay,
                "calendar" => TrendStepping::Calendar,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown stepping `{other}` (thirty_day or calendar)"
                    )))
                }
            };
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}`"
            )))
        }
    }

    context.config_manager.save(&context.config)?;
    output::success(format!("Set {key} = {value}."));
    if restart_needed {
        output::hint("Restart the shell for this setting to take effect.");
    }
    Ok(())
}
