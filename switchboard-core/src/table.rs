//! Host-owned command table: registration, lookup and line dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::Invoker;
use crate::dispatch::Dispatcher;
use crate::error::Result;

struct Entry {
    /// Lowercased primary name this entry resolves to; alias entries share
    /// the primary's dispatcher.
    primary: String,
    command: Arc<Dispatcher>,
}

/// A flat table of registered root commands, keyed by name and alias.
#[derive(Default)]
pub struct CommandTable {
    entries: HashMap<String, Entry>,
}

impl CommandTable {
    pub fn new() -> Self {
        CommandTable::default()
    }

    /// Register a command under its root name and aliases.
    ///
    /// Registration is idempotent: a name already known unregisters the
    /// stale entry, and its aliases, first. An alias already taken by a
    /// different command is left untouched.
    pub fn register(&mut self, command: Arc<Dispatcher>) {
        let name = normalize(command.name());
        if self.entries.contains_key(&name) {
            self.unregister(&name);
        }

        for alias in command.aliases() {
            let alias = normalize(alias);
            self.entries.entry(alias).or_insert_with(|| Entry {
                primary: name.clone(),
                command: Arc::clone(&command),
            });
        }
        self.entries.insert(
            name.clone(),
            Entry { primary: name, command },
        );
    }

    /// Remove a command and every alias entry still pointing at it.
    pub fn unregister(&mut self, name: &str) -> bool {
        let name = normalize(name);
        if self.entries.remove(&name).is_none() {
            return false;
        }
        self.entries.retain(|_, entry| entry.primary != name);
        true
    }

    /// Resolve a typed label (name or alias) to its dispatcher.
    pub fn lookup(&self, label: &str) -> Option<&Arc<Dispatcher>> {
        self.entries.get(&normalize(label)).map(|e| &e.command)
    }

    /// Primary names of every registered command, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| **key == entry.primary)
            .map(|(key, _)| key.clone())
            .collect();
        names.sort();
        names
    }

    /// Split a raw line and dispatch it. `Ok(None)` means the label matched
    /// no registered command.
    pub fn dispatch_line(&self, invoker: &Invoker, line: &str) -> Result<Option<bool>> {
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else {
            return Ok(None);
        };
        let tokens: Vec<String> = parts.map(str::to_string).collect();

        match self.lookup(label) {
            Some(command) => command.execute(invoker, label, &tokens).map(Some),
            None => Ok(None),
        }
    }

    /// Complete a partially typed line.
    ///
    /// A bare or partial first word completes against the table's own
    /// names; anything longer is routed into the matching command.
    pub fn complete_line(&self, invoker: &Invoker, line: &str) -> Result<Option<Vec<String>>> {
        let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let open_token = !line.is_empty() && !line.ends_with(char::is_whitespace);

        if tokens.is_empty() {
            let names = self.names();
            return Ok(if names.is_empty() { None } else { Some(names) });
        }

        if tokens.len() == 1 && open_token {
            let prefix = tokens[0].to_ascii_lowercase();
            let matches: Vec<String> = self
                .names()
                .into_iter()
                .filter(|name| name.starts_with(&prefix))
                .collect();
            return Ok(if matches.is_empty() { None } else { Some(matches) });
        }

        // A trailing space opens a fresh, empty token to complete.
        if !open_token {
            tokens.push(String::new());
        }

        let label = tokens[0].clone();
        match self.lookup(&label) {
            Some(command) => command.complete(invoker, &label, &tokens[1..]),
            None => Ok(None),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
