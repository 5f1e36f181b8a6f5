use chrono::Local;
use fintrack_core::validation::parse_position;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "Snapshot the data file",
            "backup [note...]",
            cmd_backup,
        ),
        CommandEntry::new("backups", "List snapshots, newest first", "backups", cmd_backups),
        CommandEntry::new(
            "restore",
            "Replace current data with a snapshot",
            "restore <n>",
            cmd_restore,
        ),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let note = (!note.trim().is_empty()).then_some(note.as_str());
    let info = context.tracker.store().backup(note)?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.tracker.store().list_backups()?;
    output::section("Backups");
    if backups.is_empty() {
        println!("No backups yet. Use `backup [note]` to create one.");
        return Ok(());
    }
    for (position, backup) in backups.iter().enumerate() {
        let created = backup
            .created_at
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        println!(
            "{:>3}. {}  {}  {} bytes",
            position + 1,
            backup.id,
            created,
            backup.size_bytes
        );
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <n> (see `backups`)".into(),
        ));
    };
    let index = parse_position(raw)?;
    let backups = context.tracker.store().list_backups()?;
    let Some(target) = backups.get(index) else {
        return Err(CommandError::InvalidArguments(format!(
            "there is no backup #{} ({} available)",
            index + 1,
            backups.len()
        )));
    };

    if context.is_interactive() {
        let prompt = format!("Replace current data with `{}`?", target.id);
        if !io::confirm_action(&context.theme, &prompt, false)? {
            output::info("Restore cancelled.");
            return Ok(());
        }
    }

    context.tracker.store_mut().restore_backup(target)?;
    context.tracker.reload();
    output::success(format!("Restored {}.", target.id));
    Ok(())
}
