//! Mock launcher for unit testing.
//!
//! Records every launch request so tests can assert on the exact argument
//! vector without starting a process.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::launch_player::{LaunchError, PlayerLauncher};

/// A mock implementation of [`PlayerLauncher`].
#[derive(Debug)]
pub struct RecordingLauncher {
    installed: Option<PathBuf>,
    failure: Option<io::ErrorKind>,
    launches: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl RecordingLauncher {
    /// Pretends a player is installed at `path`; launches succeed.
    pub fn with_player(path: impl Into<PathBuf>) -> Self {
        Self {
            installed: Some(path.into()),
            failure: None,
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Pretends no player is installed anywhere.
    pub fn missing_player() -> Self {
        Self {
            installed: None,
            failure: None,
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Player exists at `path`, but every launch fails with `kind`.
    pub fn failing(path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        Self {
            installed: Some(path.into()),
            failure: Some(kind),
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Returns every successful launch (oldest first).
    pub fn launches(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.launches.lock().expect("lock poisoned").clone()
    }
}

impl PlayerLauncher for RecordingLauncher {
    fn player_exists(&self, player: &Path) -> bool {
        self.installed.as_deref() == Some(player)
    }

    fn launch(&self, player: &Path, args: &[String]) -> Result<(), LaunchError> {
        if let Some(kind) = self.failure {
            return Err(LaunchError::Spawn {
                player: player.to_path_buf(),
                source: io::Error::new(kind, "mock launch failure"),
            });
        }
        self.launches
            .lock()
            .expect("lock poisoned")
            .push((player.to_path_buf(), args.to_vec()));
        Ok(())
    }
}
