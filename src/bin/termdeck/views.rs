use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Args;

use termdeck::commands::group::build;
use termdeck::refresh::RefreshKind;
use termdeck::state;
use termdeck::view::{Expansion, render_tree, render_variables};
use termdeck::watch::SettingsWatcher;

use crate::TermLauncher;

#[derive(Args, Debug, Default)]
pub struct TreeArgs {
    /// Show every group expanded, ignoring the saved tree state
    #[arg(long)]
    expand_all: bool,
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Print the variable list whenever variables are refreshed
pub fn subscribe_variables(launcher: &mut TermLauncher) {
    let color = std::io::stdout().is_terminal();
    launcher.subscribe(move |kind, settings| {
        if kind == RefreshKind::Variables {
            print_lines(&render_variables(settings, color));
        }
    });
}

/// Print the command tree whenever commands are refreshed
pub fn subscribe_tree(launcher: &mut TermLauncher, args: &TreeArgs) {
    let color = std::io::stdout().is_terminal();
    let expand_all = args.expand_all;
    let state_path = state::state_path(launcher.store().dir());
    launcher.subscribe(move |kind, settings| {
        if kind != RefreshKind::Commands {
            return;
        }
        let root = build(&settings.commands, settings.sort_order);
        let saved = state::load(&state_path);
        let expansion = if expand_all {
            Expansion::All
        } else {
            Expansion::Persisted(&saved)
        };
        print_lines(&render_tree(
            &root,
            expansion,
            &settings.command_icon_color,
            color,
        ));
    });
}

/// Show the command tree and variables, redrawing both on every settings change until
/// interrupted.
///
/// # Errors
///
/// Returns an error if the settings file cannot be watched.
pub fn watch(
    launcher: &mut TermLauncher,
    args: &TreeArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let watcher = SettingsWatcher::new(launcher.store().path())?;
    let clear = std::io::stdout().is_terminal();
    launcher.subscribe(move |kind, _| {
        if clear && kind == RefreshKind::Commands {
            print!("\x1b[2J\x1b[H");
        }
    });
    subscribe_tree(launcher, args);
    launcher.subscribe(|kind, _| {
        if kind == RefreshKind::Variables {
            println!();
        }
    });
    subscribe_variables(launcher);
    loop {
        launcher.refresh_commands();
        launcher.refresh_variables();
        if !watcher.wait_for_change() {
            break;
        }
    }
    Ok(ExitCode::SUCCESS)
}
