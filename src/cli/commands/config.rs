use fintrack_config::ConfigKey;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [show | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("show") => show(context),
        Some("set") => set(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (expected show or set)",
            other
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in ConfigKey::ALL {
        let value = context.config.get(key);
        let value = if value.is_empty() { "(default)".to_string() } else { value };
        println!("  {:<18} {}", key.as_str(), value);
    }
    println!("  {:<18} {}", "file", context.config_manager.config_path().display());
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: config set <key> <value>".into(),
        ));
    };
    if value.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: config set <key> <value>".into(),
        ));
    }
    let key = ConfigKey::parse(key)?;
    let mut updated = context.config.clone();
    updated.set(key, &value.join(" "))?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    context.apply_config();

    output::success(format!("{} = {}", key, context.config.get(key)));
    if key == ConfigKey::DataFile {
        output::info("The new data file is used from the next start.");
    }
    Ok(())
}
