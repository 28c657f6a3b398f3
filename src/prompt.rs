//! Interactive input collection
//!
//! The launcher only talks to the [`Prompter`] trait; [`InquirePrompter`] implements it on
//! top of `inquire` for the terminal. Every method returns `None` when the user cancels.

use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};
use log::debug;
use thiserror::Error;

use crate::variables::resolve::Chooser;

/// Problems with a single piece of user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("'{0}' may only contain letters, digits, '_' and '-'")]
    InvalidName(String),
    #[error("at least one option is required")]
    NoOptions,
}

/// Input check run while the user is typing
pub type Validator = fn(&str) -> Result<(), ValidationError>;

/// Accepts any input, including an empty one
pub fn accept_any(_: &str) -> Result<(), ValidationError> {
    Ok(())
}

/// Source of user input for the add, edit and run flows
pub trait Prompter: Chooser {
    /// Ask for a line of text, pre-filled with `initial`
    fn text(&mut self, message: &str, initial: Option<&str>, validate: Validator)
    -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> Option<bool>;

    /// Pick one of `options`, returning its index
    fn select(&mut self, message: &str, options: &[String], start: usize) -> Option<usize>;
}

/// Terminal prompts backed by `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

fn cancelled<T>(result: Result<Option<T>, InquireError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => None,
        Err(e) => {
            debug!("Prompt failed: {e}");
            None
        }
    }
}

impl Chooser for InquirePrompter {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<String> {
        cancelled(Select::new(prompt, options.to_vec()).prompt_skippable())
    }
}

impl Prompter for InquirePrompter {
    fn text(
        &mut self,
        message: &str,
        initial: Option<&str>,
        validate: Validator,
    ) -> Option<String> {
        let mut prompt = Text::new(message).with_validator(
            move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match validate(input) {
                    Ok(()) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.to_string().into()),
                })
            },
        );
        if let Some(initial) = initial {
            prompt = prompt.with_initial_value(initial);
        }
        cancelled(prompt.prompt_skippable())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Option<bool> {
        cancelled(Confirm::new(message).with_default(default).prompt_skippable())
    }

    fn select(&mut self, message: &str, options: &[String], start: usize) -> Option<usize> {
        cancelled(
            Select::new(message, options.to_vec())
                .with_starting_cursor(start)
                .raw_prompt()
                .map(Some),
        )
        .map(|choice| choice.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_and_interrupt_cancel() {
        let escaped: Result<Option<usize>, InquireError> = Err(InquireError::OperationCanceled);
        assert_eq!(cancelled(escaped), None);
        let interrupted: Result<Option<usize>, InquireError> =
            Err(InquireError::OperationInterrupted);
        assert_eq!(cancelled(interrupted), None);
        assert_eq!(cancelled(Ok(Some(2))).map(|i: usize| i + 1), Some(3));
        assert_eq!(cancelled::<usize>(Ok(None)), None);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::Empty("Title").to_string(),
            "Title must not be empty"
        );
        assert_eq!(
            ValidationError::NoOptions.to_string(),
            "at least one option is required"
        );
    }
}
