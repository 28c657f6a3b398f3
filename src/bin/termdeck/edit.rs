use clap::Subcommand;

use crate::TermLauncher;

/// Subcommands that change the settings file
#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Add a variable
    AddVariable,
    /// Edit an existing variable
    EditVariable {
        /// Name of the variable
        name: String,
    },
    /// Remove a variable
    RemoveVariable {
        /// Name of the variable
        name: String,
    },
    /// Add a command
    AddCommand,
    /// Edit an existing command
    EditCommand {
        /// Title of the command
        title: String,
    },
    /// Remove a command
    RemoveCommand {
        /// Title of the command
        title: String,
    },
}

pub fn run(launcher: &mut TermLauncher, command: &EditCommands) {
    match command {
        EditCommands::AddVariable => launcher.add_variable(),
        EditCommands::EditVariable { name } => launcher.edit_variable(name),
        EditCommands::RemoveVariable { name } => launcher.remove_variable(name),
        EditCommands::AddCommand => launcher.add_command(),
        EditCommands::EditCommand { title } => launcher.edit_command(title),
        EditCommands::RemoveCommand { title } => launcher.remove_command(title),
    }
}
