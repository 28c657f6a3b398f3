//! Named text variables and their substitution into command text
//!
//! A variable is either *fixed* (its `value` is used as is) or *selectable* (it has a
//! non-empty `options` list and the user picks one each time a command referencing it runs).

pub mod resolve;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named value that can be referenced from command text as `${name}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct VariableDefinition {
    /// Identifier, letters, digits, `_` and `-` only
    pub name: String,
    /// Fixed value, or the default choice of a selectable variable
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Choices offered when the variable is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl VariableDefinition {
    #[must_use]
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn selectable<S: Into<String>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            value: options.first().cloned().unwrap_or_default(),
            options: Some(options),
            ..Default::default()
        }
    }

    /// The option list if this variable is selectable
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        self.options.as_deref().filter(|o| !o.is_empty())
    }

    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.choices().is_some()
    }
}

/// Whether `name` only uses characters allowed in a variable name
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
