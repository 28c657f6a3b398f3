//! The user facing actions: refreshing views, editing variables and commands, running
//! commands.
//!
//! Every action returns `()`. Problems are reported through the [`Notifier`], never
//! propagated to the caller. Settings are re-read at the start of every action and written
//! back whole once all input has been collected, so a cancelled prompt never leaves a
//! partial change behind.

use log::{debug, info, warn};
use thiserror::Error;

use crate::commands::command::CommandDefinition;
use crate::commands::group::build;
use crate::dispatch::{Dispatch, dispatch};
use crate::notifier::{Notifier, Severity};
use crate::prompt::{Prompter, ValidationError, accept_any};
use crate::refresh::{RefreshHub, RefreshKind};
use crate::settings::{Settings, SettingsError, SettingsStore};
use crate::sink::{SinkError, SinkProvider};
use crate::state::{self, ExpandedState};
use crate::variables::{VariableDefinition, is_valid_name};

/// Errors surfaced to the user by an action
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Missing variables: {}", format_missing(.0))]
    MissingVariables(Vec<String>),
    #[error("No active terminal to send the command to")]
    NoActiveSink,
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("No command titled '{0}'")]
    UnknownCommand(String),
}

fn format_missing(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("${{{n}}}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_name(input: &str) -> Result<(), ValidationError> {
    let name = input.trim();
    if name.is_empty() {
        Err(ValidationError::Empty("Name"))
    } else if !is_valid_name(name) {
        Err(ValidationError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

fn validate_options(input: &str) -> Result<(), ValidationError> {
    if parse_options(input).is_empty() {
        Err(ValidationError::NoOptions)
    } else {
        Ok(())
    }
}

fn validate_title(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        Err(ValidationError::Empty("Title"))
    } else {
        Ok(())
    }
}

fn validate_command(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        Err(ValidationError::Empty("Command"))
    } else {
        Ok(())
    }
}

/// Split a comma separated option list, trimming entries and dropping empty ones
#[must_use]
pub fn parse_options(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(input: String) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Put `item` at `index`, or over an existing entry with the same key, or at the end.
/// Any other entry sharing the key is dropped.
fn upsert<T>(items: &mut Vec<T>, index: Option<usize>, item: T, key: impl Fn(&T) -> &str) {
    let new_key = key(&item).to_string();
    let index = index.or_else(|| items.iter().position(|e| key(e) == new_key));
    let mut position = index;
    let mut i = 0;
    items.retain(|existing| {
        let keep = Some(i) == index || key(existing) != new_key;
        if !keep && index.is_some_and(|p| i < p) {
            position = position.map(|p| p - 1);
        }
        i += 1;
        keep
    });
    match position {
        Some(p) => items[p] = item,
        None => items.push(item),
    }
}

const VARIABLE_KINDS: [&str; 2] = ["Fixed value", "Select from options"];

/// The launcher's actions over one settings file
pub struct Launcher<P, N, S> {
    store: SettingsStore,
    prompter: P,
    notifier: N,
    sinks: S,
    refresh: RefreshHub,
}

impl<P: Prompter, N: Notifier, S: SinkProvider> Launcher<P, N, S> {
    #[must_use]
    pub fn new(store: SettingsStore, prompter: P, notifier: N, sinks: S) -> Self {
        Self {
            store,
            prompter,
            notifier,
            sinks,
            refresh: RefreshHub::new(),
        }
    }

    /// Register a view to be told when variables or commands change
    pub fn subscribe(&mut self, subscriber: impl FnMut(RefreshKind, &Settings) + 'static) {
        self.refresh.subscribe(subscriber);
    }

    #[must_use]
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    fn report(&mut self, result: Result<(), LaunchError>) {
        if let Err(e) = result {
            debug!("Action failed: {e:?}");
            self.notifier.notify(&e.to_string(), Severity::Error);
        }
    }

    fn emit(&mut self, kind: RefreshKind) -> Result<(), LaunchError> {
        let settings = self.store.read()?;
        self.refresh.emit(kind, &settings);
        Ok(())
    }

    pub fn refresh_variables(&mut self) {
        let result = self.emit(RefreshKind::Variables);
        self.report(result);
    }

    pub fn refresh_commands(&mut self) {
        let result = self.emit(RefreshKind::Commands);
        self.report(result);
    }

    // Variables

    fn collect_variable(
        &mut self,
        initial: Option<&VariableDefinition>,
    ) -> Result<Option<VariableDefinition>, ValidationError> {
        let Some(name) = self.prompter.text(
            "Variable name",
            initial.map(|v| v.name.as_str()),
            validate_name,
        ) else {
            return Ok(None);
        };
        validate_name(&name)?;

        let was_selectable = initial.is_some_and(VariableDefinition::is_selectable);
        let kinds = VARIABLE_KINDS.map(str::to_string);
        let Some(kind) =
            self.prompter
                .select("Variable type", &kinds, usize::from(was_selectable))
        else {
            return Ok(None);
        };

        let (value, options) = if kind == 1 {
            let current = initial
                .and_then(VariableDefinition::choices)
                .map(|o| o.join(", "));
            let Some(raw) = self.prompter.text(
                "Options (comma separated)",
                current.as_deref(),
                validate_options,
            ) else {
                return Ok(None);
            };
            validate_options(&raw)?;
            let options = parse_options(&raw);
            let start = initial
                .and_then(|v| options.iter().position(|o| *o == v.value))
                .unwrap_or(0);
            let Some(default) = self
                .prompter
                .select("Default value", &options, start)
                .and_then(|i| options.get(i).cloned())
            else {
                return Ok(None);
            };
            (default, Some(options))
        } else {
            let Some(value) =
                self.prompter
                    .text("Value", initial.map(|v| v.value.as_str()), accept_any)
            else {
                return Ok(None);
            };
            (value, None)
        };

        let Some(description) = self.prompter.text(
            "Description (optional)",
            initial.and_then(|v| v.description.as_deref()),
            accept_any,
        ) else {
            return Ok(None);
        };

        Ok(Some(VariableDefinition {
            name: name.trim().to_string(),
            value,
            description: optional(description),
            options,
        }))
    }

    fn save_variable(&mut self, original: Option<&str>) -> Result<(), LaunchError> {
        let settings = self.store.read()?;
        let index = match original {
            Some(name) => match settings.variables.iter().position(|v| v.name == name) {
                Some(index) => Some(index),
                None => {
                    debug!("Variable '{name}' no longer exists");
                    return Ok(());
                }
            },
            None => None,
        };
        let initial = index.map(|i| settings.variables[i].clone());
        let variable = match self.collect_variable(initial.as_ref()) {
            Ok(Some(variable)) => variable,
            Ok(None) => {
                debug!("Variable input cancelled");
                return Ok(());
            }
            Err(e) => {
                warn!("Variable input rejected: {e}");
                return Ok(());
            }
        };

        let name = variable.name.clone();
        // Re-read so edits made while prompting are not lost
        let mut variables = self.store.read()?.variables;
        let index = original.and_then(|n| variables.iter().position(|v| v.name == n));
        if original.is_some() && index.is_none() {
            debug!("Variable removed while editing, dropping the edit");
            return Ok(());
        }
        upsert(&mut variables, index, variable, |v| v.name.as_str());
        self.store.write_variables(variables)?;
        info!("Saved variable '{name}'");
        self.notifier
            .notify(&format!("Saved variable '{name}'"), Severity::Info);
        self.emit(RefreshKind::Variables)
    }

    pub fn add_variable(&mut self) {
        let result = self.save_variable(None);
        self.report(result);
    }

    pub fn edit_variable(&mut self, name: &str) {
        let result = self.save_variable(Some(name));
        self.report(result);
    }

    fn delete_variable(&mut self, name: &str) -> Result<(), LaunchError> {
        let mut variables = self.store.read()?.variables;
        if !variables.iter().any(|v| v.name == name) {
            debug!("Variable '{name}' no longer exists");
            return Ok(());
        }
        if self.prompter.confirm(&format!("Remove variable '{name}'?"), false) != Some(true) {
            return Ok(());
        }
        variables.retain(|v| v.name != name);
        self.store.write_variables(variables)?;
        info!("Removed variable '{name}'");
        self.emit(RefreshKind::Variables)
    }

    pub fn remove_variable(&mut self, name: &str) {
        let result = self.delete_variable(name);
        self.report(result);
    }

    // Commands

    fn collect_command(
        &mut self,
        initial: Option<&CommandDefinition>,
    ) -> Result<Option<CommandDefinition>, ValidationError> {
        let Some(title) =
            self.prompter
                .text("Title", initial.map(|c| c.title.as_str()), validate_title)
        else {
            return Ok(None);
        };
        validate_title(&title)?;

        let Some(command) = self.prompter.text(
            "Command (use ${name} for variables)",
            initial.map(|c| c.command.as_str()),
            validate_command,
        ) else {
            return Ok(None);
        };
        validate_command(&command)?;

        let Some(group) = self.prompter.text(
            "Group (optional, e.g. Ops/Deploy)",
            initial.and_then(|c| c.group.as_deref()),
            accept_any,
        ) else {
            return Ok(None);
        };

        let Some(description) = self.prompter.text(
            "Description (optional)",
            initial.and_then(|c| c.description.as_deref()),
            accept_any,
        ) else {
            return Ok(None);
        };

        let current_new_line = initial.and_then(|c| c.send_new_line);
        let Some(send_new_line) = self.prompter.confirm(
            "Press enter after sending the command?",
            current_new_line.unwrap_or(true),
        ) else {
            return Ok(None);
        };
        // Only store the flag when it says something the default doesn't
        let send_new_line = match current_new_line {
            Some(current) if current == send_new_line => Some(current),
            _ if send_new_line => None,
            _ => Some(false),
        };

        let mut definition = initial.cloned().unwrap_or_default();
        definition.title = title.trim().to_string();
        definition.command = command.trim().to_string();
        definition.group = optional(group);
        definition.description = optional(description);
        definition.send_new_line = send_new_line;
        Ok(Some(definition))
    }

    fn save_command(&mut self, original: Option<&str>) -> Result<(), LaunchError> {
        let settings = self.store.read()?;
        let initial = match original {
            Some(title) => match settings.commands.iter().find(|c| c.title == title) {
                Some(command) => Some(command.clone()),
                None => {
                    debug!("Command '{title}' no longer exists");
                    return Ok(());
                }
            },
            None => None,
        };
        let command = match self.collect_command(initial.as_ref()) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!("Command input cancelled");
                return Ok(());
            }
            Err(e) => {
                warn!("Command input rejected: {e}");
                return Ok(());
            }
        };

        let title = command.title.clone();
        let mut commands = self.store.read()?.commands;
        let index = original.and_then(|t| commands.iter().position(|c| c.title == t));
        if original.is_some() && index.is_none() {
            debug!("Command removed while editing, dropping the edit");
            return Ok(());
        }
        upsert(&mut commands, index, command, |c| c.title.as_str());
        self.store.write_commands(commands)?;
        info!("Saved command '{title}'");
        self.notifier
            .notify(&format!("Saved command '{title}'"), Severity::Info);
        self.emit(RefreshKind::Commands)
    }

    pub fn add_command(&mut self) {
        let result = self.save_command(None);
        self.report(result);
    }

    pub fn edit_command(&mut self, title: &str) {
        let result = self.save_command(Some(title));
        self.report(result);
    }

    fn delete_command(&mut self, title: &str) -> Result<(), LaunchError> {
        let mut commands = self.store.read()?.commands;
        if !commands.iter().any(|c| c.title == title) {
            debug!("Command '{title}' no longer exists");
            return Ok(());
        }
        if self.prompter.confirm(&format!("Remove command '{title}'?"), false) != Some(true) {
            return Ok(());
        }
        commands.retain(|c| c.title != title);
        self.store.write_commands(commands)?;
        info!("Removed command '{title}'");
        self.emit(RefreshKind::Commands)
    }

    pub fn remove_command(&mut self, title: &str) {
        let result = self.delete_command(title);
        self.report(result);
    }

    // Running

    fn pick_command(&mut self, settings: &Settings) -> Option<CommandDefinition> {
        let root = build(&settings.commands, settings.sort_order);
        let entries = root.all_commands();
        if entries.is_empty() {
            self.notifier.notify("No commands configured", Severity::Info);
            return None;
        }
        let labels: Vec<String> = entries
            .iter()
            .map(|(group, command)| format!("{} › {}", group.path, command.title))
            .collect();
        let index = self.prompter.select("Run command", &labels, 0)?;
        entries.get(index).map(|(_, command)| (*command).clone())
    }

    fn launch(&mut self, definition: Option<&CommandDefinition>) -> Result<(), LaunchError> {
        let settings = self.store.read()?;
        let picked;
        let definition = match definition {
            Some(definition) => definition,
            None => match self.pick_command(&settings) {
                Some(command) => {
                    picked = command;
                    &picked
                }
                None => return Ok(()),
            },
        };

        match dispatch(
            definition,
            &settings.variables,
            &mut self.prompter,
            settings.send_new_line,
        ) {
            Dispatch::Failed { missing } => Err(LaunchError::MissingVariables(missing)),
            Dispatch::Dispatched {
                text,
                send_new_line,
            } => {
                let mut sink = self.sinks.active_sink().ok_or(LaunchError::NoActiveSink)?;
                sink.show();
                sink.send(&text, send_new_line)?;
                Ok(())
            }
        }
    }

    /// Run `definition`, or let the user pick one when `None`
    pub fn run_command(&mut self, definition: Option<&CommandDefinition>) {
        let result = self.launch(definition);
        self.report(result);
    }

    /// Run the command with `title`
    pub fn run_titled(&mut self, title: &str) {
        let result = self.store.read().map_err(LaunchError::from).and_then(|settings| {
            settings
                .commands
                .into_iter()
                .rev()
                .find(|c| c.title == title)
                .ok_or_else(|| LaunchError::UnknownCommand(title.to_string()))
        });
        match result {
            Ok(definition) => self.run_command(Some(&definition)),
            Err(e) => self.report(Err(e)),
        }
    }

    // Tree state

    fn set_expanded(&mut self, path: &str, expanded: bool) -> Result<(), LaunchError> {
        let state_path = state::state_path(self.store.dir());
        let mut state: ExpandedState = state::load(&state_path);
        let changed = if expanded {
            state.expand(path)
        } else {
            state.collapse(path)
        };
        if changed {
            state::save(&state_path, &state)?;
            self.emit(RefreshKind::Commands)?;
        }
        Ok(())
    }

    pub fn expand_group(&mut self, path: &str) {
        let result = self.set_expanded(path, true);
        self.report(result);
    }

    pub fn collapse_group(&mut self, path: &str) {
        let result = self.set_expanded(path, false);
        self.report(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_message() {
        let e = LaunchError::MissingVariables(vec!["service".to_string(), "port".to_string()]);
        assert_eq!(e.to_string(), "Missing variables: ${service}, ${port}");
    }

    #[test]
    fn test_parse_options() {
        assert_eq!(parse_options(" a, b ,,c , "), vec!["a", "b", "c"]);
        assert!(parse_options(" , ").is_empty());
    }

    #[test]
    fn test_validators() {
        assert_eq!(validate_name(" "), Err(ValidationError::Empty("Name")));
        assert_eq!(
            validate_name("a b"),
            Err(ValidationError::InvalidName("a b".to_string()))
        );
        assert!(validate_name(" ok_name ").is_ok());
        assert_eq!(validate_options(","), Err(ValidationError::NoOptions));
        assert!(validate_title("").is_err());
        assert!(validate_command("  ").is_err());
    }

    fn key<'a>(item: &'a (&'static str, u8)) -> &'a str {
        item.0
    }

    #[test]
    fn test_upsert_replaces_in_place_and_drops_collisions() {
        let mut items = vec![("a", 1), ("b", 1), ("c", 1)];
        upsert(&mut items, Some(2), ("a", 2), key);
        assert_eq!(items, vec![("b", 1), ("a", 2)]);

        let mut items = vec![("a", 1), ("b", 1), ("c", 1)];
        upsert(&mut items, None, ("a", 2), key);
        assert_eq!(items, vec![("a", 2), ("b", 1), ("c", 1)]);

        let mut items = vec![("a", 1)];
        upsert(&mut items, None, ("b", 1), key);
        assert_eq!(items, vec![("a", 1), ("b", 1)]);
    }
}
