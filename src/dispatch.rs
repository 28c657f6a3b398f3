//! Turning a command definition into the final text handed to a terminal

use log::debug;

use crate::commands::command::CommandDefinition;
use crate::variables::VariableDefinition;
use crate::variables::resolve::{Chooser, resolve};

/// What should happen with a command after variable substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Ready to be sent; `send_new_line` says whether to press enter afterwards
    Dispatched { text: String, send_new_line: bool },
    /// One or more variables could not be resolved, nothing should be sent
    Failed { missing: Vec<String> },
}

/// Resolve the variables in `definition` and decide whether it can be sent.
///
/// `default_send_new_line` is the global setting used when the command doesn't set its own;
/// when neither is set a newline is sent.
#[must_use]
pub fn dispatch(
    definition: &CommandDefinition,
    variables: &[VariableDefinition],
    chooser: &mut impl Chooser,
    default_send_new_line: Option<bool>,
) -> Dispatch {
    let resolution = resolve(&definition.command, variables, chooser);
    if !resolution.is_complete() {
        debug!(
            "Command '{}' has unresolved variables: {:?}",
            definition.title, resolution.missing
        );
        return Dispatch::Failed {
            missing: resolution.missing,
        };
    }
    Dispatch::Dispatched {
        text: resolution.result,
        send_new_line: definition
            .send_new_line
            .or(default_send_new_line)
            .unwrap_or(true),
    }
}
