//! Core implementation of the termdeck command launcher
//!
//! termdeck keeps named variables and grouped shell command templates in a settings file.
//! Running a command substitutes its `${name}` tokens, asking the user to pick a value for
//! variables that offer several options, and hands the result to a shell.
//!
//! The engine lives in [`variables`], [`commands`], [`sort`] and [`dispatch`]; everything
//! touching the user (prompts, notifications, the shell, views) sits behind the traits used
//! by [`launcher`].

use schemars::Schema;

use crate::settings::Settings;

pub mod commands;
pub mod dispatch;
pub mod launcher;
pub mod logger;
pub mod notifier;
pub mod prompt;
pub mod refresh;
pub mod settings;
pub mod sink;
pub mod sort;
pub mod state;
pub mod theme;
pub mod variables;
pub mod view;
pub mod watch;

/// JSON Schema describing the settings file, for editor completion and validation
#[must_use]
pub fn settings_schema() -> Schema {
    schemars::schema_for!(Settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_uses_settings_keys() {
        let schema = serde_json::to_value(settings_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for key in ["sortOrder", "commandIconColor", "variables", "commands"] {
            assert!(properties.contains_key(key), "missing {key}");
        }
    }
}
