use clap::Args;

use crate::TermLauncher;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Title of the command to run (pick interactively if omitted)
    title: Option<String>,
}

/// Run a command by title, or let the user pick one from the tree.
pub fn run(launcher: &mut TermLauncher, args: &RunArgs) {
    match args.title {
        Some(ref title) => launcher.run_titled(title),
        None => launcher.run_command(None),
    }
}
