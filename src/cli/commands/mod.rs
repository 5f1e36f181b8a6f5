pub mod backup;
pub mod config;
pub mod goal;
pub mod ledger;
pub mod reports;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "balance", "add", "edit", "delete", "list", "chart", "goal", "progress", "summary", "backup",
    "backups", "restore", "config", "version", "help", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(ledger::definitions());
    commands.extend(goal::definitions());
    commands.extend(reports::definitions());
    commands.extend(backup::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_follows_root_order() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
        for (alias, target) in [("ls", "list"), ("rm", "delete"), ("quit", "exit"), ("q", "exit")] {
            assert_eq!(registry.get(alias).map(|entry| entry.name), Some(target));
        }
    }
}
