use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Typos further than this from every command get no suggestion.
const SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            aliases: &[],
            handler,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Shell commands in display order. Names and aliases share one lookup table;
/// an alias never shadows a command name.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-registering a name replaces the entry but keeps its position.
    pub fn register(&mut self, entry: CommandEntry) {
        let index = match self.position_of(entry.name) {
            Some(index) => {
                self.entries[index] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        let entry = &self.entries[index];
        self.lookup.insert(entry.name, index);
        for &alias in entry.aliases {
            if self.position_of(alias).is_none() {
                self.lookup.insert(alias, index);
            }
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Resolves a command name or alias.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|&index| &self.entries[index])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Names and aliases, sorted, for line completion.
    pub fn completions(&self) -> Vec<&'static str> {
        let mut words: Vec<&'static str> = self.lookup.keys().copied().collect();
        words.sort_unstable();
        words
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Closest command name to a mistyped `input`, if any is close enough.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}
