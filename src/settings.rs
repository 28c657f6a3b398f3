//! Settings file handling for termdeck
//!
//! The settings file is the only persisted state. It is read fresh for every action and
//! written back whole, never patched in place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::command::CommandDefinition;
use crate::sort::SortOrder;
use crate::variables::{VariableDefinition, is_valid_name};

/// Errors that can occur while loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("No settings file found in current directory or its parents: {0}")]
    SettingsNotFound(PathBuf),
    #[error("Unknown working directory: {0}")]
    UnknownWorkingDirectory(String),
    #[error("Unable to parse YAML settings file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON settings file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Unable to write settings file {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Invalid settings: {0}")]
    Validation(String),
}

/// Root of the settings document
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Order of variables and of commands and groups in the command tree
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Theme color applied to command entries, e.g. `terminal.ansiCyan`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command_icon_color: String,
    /// Default for commands that don't set `sendNewLine`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_new_line: Option<bool>,
    /// Shell used to run commands (defaults to `$SHELL`, then `/bin/sh`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

/// List of supported settings file names
pub const FILENAMES: [&str; 3] = [".termdeck.json", ".termdeck.yaml", ".termdeck.yml"];

fn is_json(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "json")
}

impl Settings {
    /// Loads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::SettingsNotFound` if the file cannot be read,
    /// `SettingsError::Yaml`/`SettingsError::Json` if parsing fails, or
    /// `SettingsError::Validation` if an entry is unusable.
    pub fn from_file(file: &Path) -> Result<Settings, SettingsError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| SettingsError::SettingsNotFound(file.to_path_buf()))?;
        let settings = Self::parse(&contents, file)?;
        settings.validate()?;
        Ok(settings)
    }

    fn parse(contents: &str, file: &Path) -> Result<Settings, SettingsError> {
        // An empty YAML document is a valid, empty settings file
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }
        if is_json(file) {
            serde_json::from_str(contents).map_err(|e| SettingsError::Json {
                source: e,
                path: file.to_path_buf(),
            })
        } else {
            serde_yaml::from_str(contents).map_err(|e| SettingsError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })
        }
    }

    /// Writes the whole document to `file`, as JSON or YAML depending on its extension.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Io` if the file cannot be written.
    pub fn to_file(&self, file: &Path) -> Result<(), SettingsError> {
        let contents = if is_json(file) {
            serde_json::to_string_pretty(self)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| SettingsError::Json {
                    source: e,
                    path: file.to_path_buf(),
                })?
        } else {
            serde_yaml::to_string(self).map_err(|e| SettingsError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        std::fs::write(file, contents).map_err(|e| SettingsError::Io {
            source: e,
            path: file.to_path_buf(),
        })
    }

    fn validate(&self) -> Result<(), SettingsError> {
        // No `${...}` token can reference such a name; the entry stays as written
        for var in self.variables.iter().filter(|v| !is_valid_name(&v.name)) {
            warn!(
                "Variable name '{}' may only contain letters, digits, '_' and '-'",
                var.name
            );
        }
        for cmd in &self.commands {
            if cmd.title.trim().is_empty() {
                return Err(SettingsError::Validation(format!(
                    "Command '{}' has an empty title",
                    cmd.command
                )));
            }
            if cmd.command.trim().is_empty() {
                return Err(SettingsError::Validation(format!(
                    "Command '{}' has an empty command string",
                    cmd.title
                )));
            }
        }
        warn_duplicates(self.variables.iter().map(|v| v.name.as_str()), "variable");
        warn_duplicates(self.commands.iter().map(|c| c.title.as_str()), "command");
        Ok(())
    }

    /// Searches for a settings file in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnknownWorkingDirectory` if the cwd cannot be determined,
    /// or `SettingsError::SettingsNotFound` if no settings file is found.
    pub fn find() -> Result<PathBuf, SettingsError> {
        let cwd = std::env::current_dir()
            .map_err(|e| SettingsError::UnknownWorkingDirectory(e.to_string()))?;
        Self::find_from(&cwd)
    }

    /// Searches for a settings file in `start` and its parents.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::SettingsNotFound` if no settings file is found.
    pub fn find_from(start: &Path) -> Result<PathBuf, SettingsError> {
        let mut path = start.to_path_buf();
        debug!("Searching for settings file in {}", start.display());
        loop {
            for file in &FILENAMES {
                let settings_path = path.join(file);
                if settings_path.exists() {
                    info!("Found settings file: {}", settings_path.display());
                    return Ok(settings_path);
                }
            }
            if !path.pop() {
                return Err(SettingsError::SettingsNotFound(start.to_path_buf()));
            }
        }
    }
}

fn warn_duplicates<'a>(keys: impl Iterator<Item = &'a str>, kind: &str) {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            warn!("Duplicate {kind} '{key}', the last definition wins");
        }
    }
}

/// Read/write access to the variable and command lists of one settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at `settings`, or the first settings file found from the cwd upwards.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::SettingsNotFound` if the file doesn't exist or none is found.
    pub fn open(settings: Option<&str>) -> Result<Self, SettingsError> {
        let path = match settings {
            Some(file) => {
                let path = PathBuf::from(file);
                if !path.exists() {
                    return Err(SettingsError::SettingsNotFound(path));
                }
                path
            }
            None => Settings::find()?,
        };
        Ok(Self::new(path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the settings file, used as working directory for commands
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Read the current settings from disk.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_file`].
    pub fn read(&self) -> Result<Settings, SettingsError> {
        Settings::from_file(&self.path)
    }

    /// Replace the stored variable list.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be re-read or written.
    pub fn write_variables(&self, variables: Vec<VariableDefinition>) -> Result<(), SettingsError> {
        let mut settings = self.read()?;
        settings.variables = variables;
        debug!("Writing {} variables", settings.variables.len());
        settings.to_file(&self.path)
    }

    /// Replace the stored command list.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be re-read or written.
    pub fn write_commands(&self, commands: Vec<CommandDefinition>) -> Result<(), SettingsError> {
        let mut settings = self.read()?;
        settings.commands = commands;
        debug!("Writing {} commands", settings.commands.len());
        settings.to_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.json");
        std::fs::write(
            &path,
            r#"{
                "sortOrder": "alphabetical",
                "commandIconColor": "terminal.ansiGreen",
                "variables": [{"name": "host", "value": "localhost"}],
                "commands": [{"title": "ssh", "command": "ssh ${host}", "sendNewLine": false}]
            }"#,
        )
        .unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.sort_order, SortOrder::Alphabetical);
        assert_eq!(settings.command_icon_color, "terminal.ansiGreen");
        assert_eq!(settings.variables[0].value, "localhost");
        assert_eq!(settings.commands[0].send_new_line, Some(false));
    }

    #[test]
    fn test_from_file_yaml_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.yaml");
        std::fs::write(
            &path,
            "commands:\n  - title: list\n    command: ls -la\n    group: Files\n",
        )
        .unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.sort_order, SortOrder::Settings);
        assert!(settings.command_icon_color.is_empty());
        assert!(settings.variables.is_empty());
        assert_eq!(settings.commands[0].group.as_deref(), Some("Files"));
        assert_eq!(settings.commands[0].send_new_line, None);
    }

    #[test]
    fn test_empty_file_is_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.yml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(Settings::from_file(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_variable_name_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.yaml");
        std::fs::write(
            &path,
            "variables:\n  - name: bad name\n    value: x\n  - name: ok\n    value: y\n",
        )
        .unwrap();
        let settings = Settings::from_file(&path).unwrap();
        let names: Vec<&str> = settings.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["bad name", "ok"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.yaml");
        std::fs::write(&path, "commands:\n  - title: noop\n    command: '  '\n").unwrap();
        match Settings::from_file(&path) {
            Err(SettingsError::Validation(msg)) => assert!(msg.contains("noop"), "got: {msg}"),
            other => panic!("Expected Validation error, got: {other:?}"),
        }
    }

    #[test]
    fn test_find_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".termdeck.yaml"), "").unwrap();
        let found = Settings::find_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(".termdeck.yaml"));
    }

    #[test]
    fn test_store_replaces_lists_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".termdeck.json");
        std::fs::write(&path, r#"{"sortOrder": "alphabetical", "shell": "bash"}"#).unwrap();
        let store = SettingsStore::new(&path);

        store
            .write_variables(vec![VariableDefinition::fixed("a", "1")])
            .unwrap();
        store
            .write_commands(vec![CommandDefinition::new("echo", "echo ${a}")])
            .unwrap();

        let settings = store.read().unwrap();
        assert_eq!(settings.sort_order, SortOrder::Alphabetical);
        assert_eq!(settings.shell.as_deref(), Some("bash"));
        assert_eq!(settings.variables, vec![VariableDefinition::fixed("a", "1")]);
        assert_eq!(settings.commands[0].title, "echo");
        assert_eq!(store.dir(), dir.path());
    }

    #[test]
    fn test_store_dir_for_bare_file_name() {
        let store = SettingsStore::new(".termdeck.yaml");
        assert_eq!(store.dir(), Path::new("."));
        assert!(store.dir().is_dir());

        let nested = SettingsStore::new("conf/.termdeck.yaml");
        assert_eq!(nested.dir(), Path::new("conf"));
    }
}
