//! Watching the settings file for outside edits

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::state::STATE_FILENAME;

/// Quiet period after the last change before a reload is signalled
pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Unable to watch {path}: {source}")]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// A running watcher; dropping it stops watching
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl SettingsWatcher {
    /// Watch the settings file and the tree state file next to it.
    ///
    /// The directory is watched rather than the file, so editors that save by replacing the
    /// file are picked up too.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Notify` if the platform watcher cannot be started.
    pub fn new(settings_path: &Path) -> Result<Self, WatchError> {
        let dir = settings_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let settings_name = settings_path.file_name().map(ToOwned::to_owned);
        let (tx, changes) = crossbeam_channel::unbounded();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                    )
                    && event.paths.iter().any(|p| {
                        let name = p.file_name();
                        name == settings_name.as_deref()
                            || name == Some(std::ffi::OsStr::new(STATE_FILENAME))
                    })
                {
                    let _ = tx.send(());
                }
            })
            .map_err(|e| WatchError::Notify {
                path: dir.clone(),
                source: e,
            })?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Notify {
                path: dir.clone(),
                source: e,
            })?;
        info!("Watching {} for changes", settings_path.display());

        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Block until the settings changed and then stayed quiet for [`DEBOUNCE`].
    ///
    /// Returns `false` once the watcher has shut down.
    pub fn wait_for_change(&self) -> bool {
        if self.changes.recv().is_err() {
            return false;
        }
        loop {
            match self.changes.recv_timeout(DEBOUNCE) {
                Ok(()) => {}
                Err(RecvTimeoutError::Timeout) => {
                    debug!("Settings changed");
                    return true;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_requires_existing_directory() {
        let result = SettingsWatcher::new(Path::new("/definitely/not/here/.termdeck.yaml"));
        assert!(result.is_err());
    }
}
