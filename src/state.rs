//! Persisted view state: which groups of the command tree are expanded
//!
//! Stored next to the settings file so it follows the project, not the user.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

pub const STATE_FILENAME: &str = ".termdeck-state.json";

/// Group paths currently shown expanded, in the order they were expanded
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpandedState {
    #[serde(default)]
    expanded: Vec<String>,
}

impl ExpandedState {
    #[must_use]
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.iter().any(|p| p == path)
    }

    /// Mark `path` expanded; returns whether anything changed
    pub fn expand(&mut self, path: &str) -> bool {
        if self.is_expanded(path) {
            return false;
        }
        self.expanded.push(path.to_string());
        true
    }

    /// Mark `path` collapsed; returns whether anything changed
    pub fn collapse(&mut self, path: &str) -> bool {
        let before = self.expanded.len();
        self.expanded.retain(|p| p != path);
        before != self.expanded.len()
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.expanded
    }
}

/// Location of the state file belonging to a settings file
#[must_use]
pub fn state_path(settings_dir: &Path) -> PathBuf {
    settings_dir.join(STATE_FILENAME)
}

/// Load the expanded state, treating a missing or unreadable file as "nothing expanded".
#[must_use]
pub fn load(path: &Path) -> ExpandedState {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return ExpandedState::default();
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        debug!("Ignoring unreadable state file {}: {e}", path.display());
        ExpandedState::default()
    })
}

/// Write the expanded state.
///
/// # Errors
///
/// Returns `SettingsError::Json` or `SettingsError::Io` if the file cannot be written.
pub fn save(path: &Path, state: &ExpandedState) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(state).map_err(|e| SettingsError::Json {
        source: e,
        path: path.to_path_buf(),
    })?;
    std::fs::write(path, json).map_err(|e| SettingsError::Io {
        source: e,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_and_collapse() {
        let mut state = ExpandedState::default();
        assert!(state.expand("Ops"));
        assert!(!state.expand("Ops"));
        assert!(state.expand("Ops/Deploy"));
        assert!(state.is_expanded("Ops/Deploy"));
        assert!(state.collapse("Ops"));
        assert!(!state.collapse("Ops"));
        assert_eq!(state.paths(), ["Ops/Deploy"]);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = state_path(dir.path());
        assert_eq!(load(&path), ExpandedState::default());

        let mut state = ExpandedState::default();
        state.expand("Ungrouped");
        save(&path, &state).unwrap();
        assert!(load(&path).is_expanded("Ungrouped"));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = state_path(dir.path());
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load(&path), ExpandedState::default());
    }
}
