use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::variables::VariableDefinition;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_-]+)\}").expect("valid token pattern"));

/// Asks the user to pick one of several values.
///
/// Returning `None` means the user cancelled.
pub trait Chooser {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<String>;
}

impl<F> Chooser for F
where
    F: FnMut(&str, &[String]) -> Option<String>,
{
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<String> {
        self(prompt, options)
    }
}

/// Outcome of substituting variables into a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Text with every resolved token replaced; unresolved tokens are left as written
    pub result: String,
    /// Names that could not be resolved, in order of first occurrence
    pub missing: Vec<String>,
}

impl Resolution {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Distinct variable names referenced by `text`, in order of first occurrence
#[must_use]
pub fn referenced_names(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in TOKEN.captures_iter(text) {
        if let Some(name) = caps.get(1).map(|m| m.as_str())
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}

fn choice_prompt(variable: &VariableDefinition) -> String {
    match variable.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            format!("Select a value for ${{{}}} ({description})", variable.name)
        }
        _ => format!("Select a value for ${{{}}}", variable.name),
    }
}

/// Substitute `${name}` tokens in `text` with values from `variables`.
///
/// Each distinct name is resolved once, in the order it first appears in `text`. Selectable
/// variables ask `chooser`; the calls happen one after another in that same order. Names
/// without a definition, or whose prompt was cancelled, end up in
/// [`Resolution::missing`] and keep their literal token in the result.
#[must_use]
pub fn resolve(
    text: &str,
    variables: &[VariableDefinition],
    chooser: &mut impl Chooser,
) -> Resolution {
    let mut values: HashMap<&str, String> = HashMap::new();
    let mut missing = Vec::new();

    for name in referenced_names(text) {
        // Later definitions win, matching how the store treats duplicate names
        let Some(variable) = variables.iter().rev().find(|v| v.name == name) else {
            debug!("No definition for variable '{name}'");
            missing.push(name.to_string());
            continue;
        };
        match variable.choices() {
            Some(options) => match chooser.choose(&choice_prompt(variable), options) {
                Some(choice) => {
                    values.insert(name, choice);
                }
                None => {
                    debug!("Selection for variable '{name}' cancelled");
                    missing.push(name.to_string());
                }
            },
            None => {
                values.insert(name, variable.value.clone());
            }
        }
    }

    let result = TOKEN
        .replace_all(text, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned();

    Resolution { result, missing }
}
