mod edit;
mod run;
mod views;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use termdeck::launcher::Launcher;
use termdeck::notifier::StderrNotifier;
use termdeck::prompt::InquirePrompter;
use termdeck::settings::SettingsStore;
use termdeck::sink::ShellSinkProvider;

/// Launcher wired to the terminal
pub type TermLauncher = Launcher<InquirePrompter, StderrNotifier, ShellSinkProvider>;

#[derive(Parser, Debug)]
#[command(
    name = "termdeck",
    about = "Run grouped shell command templates with variables"
)]
struct Cli {
    /// Path to settings file (auto-detected if not specified)
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (mirrors log output to a file)
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the configured variables
    Variables,
    /// Show the command tree
    Commands(views::TreeArgs),
    /// Run a command by title, or pick one interactively
    Run(run::RunArgs),
    #[command(flatten)]
    Edit(edit::EditCommands),
    /// Expand a group of the command tree
    Expand {
        /// Group path, e.g. `Ops/Deploy`
        path: String,
    },
    /// Collapse a group of the command tree
    Collapse {
        /// Group path, e.g. `Ops/Deploy`
        path: String,
    },
    /// Show the tree and variables, redrawn whenever the settings change
    Watch(views::TreeArgs),
    /// Print the JSON Schema of the settings file
    Schema,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    termdeck::logger::init(log_file);

    if matches!(cli.command, Some(Commands::Schema)) {
        println!(
            "{}",
            serde_json::to_string_pretty(&termdeck::settings_schema())?
        );
        return Ok(ExitCode::SUCCESS);
    }

    let store = SettingsStore::open(cli.config.as_deref())?;
    let sinks = ShellSinkProvider::new(store.clone());
    let mut launcher = Launcher::new(store, InquirePrompter, StderrNotifier::new(), sinks);

    match cli.command {
        None => launcher.run_command(None),
        Some(Commands::Variables) => {
            views::subscribe_variables(&mut launcher);
            launcher.refresh_variables();
        }
        Some(Commands::Commands(ref args)) => {
            views::subscribe_tree(&mut launcher, args);
            launcher.refresh_commands();
        }
        Some(Commands::Run(ref args)) => run::run(&mut launcher, args),
        Some(Commands::Edit(ref command)) => edit::run(&mut launcher, command),
        Some(Commands::Expand { ref path }) => {
            views::subscribe_tree(&mut launcher, &views::TreeArgs::default());
            launcher.expand_group(path);
        }
        Some(Commands::Collapse { ref path }) => {
            views::subscribe_tree(&mut launcher, &views::TreeArgs::default());
            launcher.collapse_group(path);
        }
        Some(Commands::Watch(ref args)) => return views::watch(&mut launcher, args),
        Some(Commands::Schema) => unreachable!("handled before loading settings"),
    }

    Ok(ExitCode::SUCCESS)
}
