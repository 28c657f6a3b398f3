//! Where dispatched command text ends up
//!
//! A sink is the terminal side of the launcher: it is shown, then receives the final command
//! text. [`ShellSink`] hands the text to a shell with inherited stdio.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use anstyle::{Reset, Style};
use log::{debug, info, warn};
use thiserror::Error;

use crate::settings::SettingsStore;
use crate::theme;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Unable to start {shell}: {source}")]
    Spawn {
        shell: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to write to the terminal: {0}")]
    Io(#[from] std::io::Error),
}

/// A terminal that can receive command text
pub trait Sink {
    /// Bring the terminal to the user's attention
    fn show(&mut self);

    /// Send `text`, followed by enter when `append_newline` is set
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the text could not be delivered.
    fn send(&mut self, text: &str, append_newline: bool) -> Result<(), SinkError>;
}

/// Hands out the currently active sink, if any
pub trait SinkProvider {
    fn active_sink(&mut self) -> Option<Box<dyn Sink + '_>>;
}

const ARROW_STYLE: Style = Style::new().fg_color(Some(theme::ACCENT));

/// Runs commands with `<shell> -c <text>` in a fixed working directory
#[derive(Debug)]
pub struct ShellSink {
    shell: PathBuf,
    cwd: PathBuf,
}

impl ShellSink {
    #[must_use]
    pub fn new(shell: PathBuf, cwd: PathBuf) -> Self {
        Self { shell, cwd }
    }
}

impl Sink for ShellSink {
    fn show(&mut self) {
        debug!("Using shell {} in {}", self.shell.display(), self.cwd.display());
    }

    fn send(&mut self, text: &str, append_newline: bool) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout();
        if !append_newline {
            // Without enter the command is only placed, the user runs it themselves
            write!(stdout, "{text}")?;
            stdout.flush()?;
            return Ok(());
        }

        writeln!(stdout, "{ARROW_STYLE}❱{Reset} {text}")?;
        stdout.flush()?;
        let status = ProcessCommand::new(&self.shell)
            .arg("-c")
            .arg(text)
            .current_dir(&self.cwd)
            .status()
            .map_err(|e| SinkError::Spawn {
                shell: self.shell.clone(),
                source: e,
            })?;
        if status.success() {
            info!("Command finished: {text}");
        } else {
            warn!("Command exited with {status}: {text}");
        }
        Ok(())
    }
}

/// Locate `program` either as a path or on `$PATH`
#[must_use]
pub fn find_program(program: &str) -> Option<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(program);
        return path.is_file().then_some(path);
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Provides a [`ShellSink`] running in the settings directory when the configured shell can
/// be found
#[derive(Debug, Clone)]
pub struct ShellSinkProvider {
    store: SettingsStore,
}

impl ShellSinkProvider {
    #[must_use]
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// The `shell` setting, falling back to `$SHELL`, then `/bin/sh`
    fn shell_program(&self) -> String {
        let configured = match self.store.read() {
            Ok(settings) => settings.shell,
            Err(e) => {
                debug!("Using the default shell: {e}");
                None
            }
        };
        configured
            .filter(|s| !s.trim().is_empty())
            .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "/bin/sh".to_string())
    }
}

impl SinkProvider for ShellSinkProvider {
    fn active_sink(&mut self) -> Option<Box<dyn Sink + '_>> {
        let program = self.shell_program();
        let Some(shell) = find_program(&program) else {
            warn!("Shell '{program}' not found");
            return None;
        };
        Some(Box::new(ShellSink::new(
            shell,
            self.store.dir().to_path_buf(),
        )))
    }
}
