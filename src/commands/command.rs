use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A shell command template shown in the command tree.
///
/// `title` is the identity used by edit and remove; `command` may contain `${name}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    /// Display name, unique within the settings file
    pub title: String,
    /// Command text, may reference variables as `${name}`
    pub command: String,
    /// Slash separated group path, e.g. `Ops/Deploy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Theme color id overriding `commandIconColor`, e.g. `terminal.ansiGreen`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    /// Press enter after sending the command (defaults to the global setting, then `true`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_new_line: Option<bool>,
}

impl CommandDefinition {
    #[must_use]
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
