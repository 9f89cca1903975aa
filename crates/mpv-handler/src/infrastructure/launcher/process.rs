//! Process-spawning launcher.
//!
//! # Fire and forget (for beginners)
//!
//! `Command::spawn` returns as soon as the OS has created the child.  We never
//! call `wait()` on the returned handle: the handler exits right away and the
//! player keeps running on its own.  Dropping a `Child` in Rust does not kill
//! the process.
//!
//! Each argument is handed to the OS as a separate element, so no shell ever
//! re-interprets the URL.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::application::launch_player::{LaunchError, PlayerLauncher};

/// [`PlayerLauncher`] that starts a real process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl PlayerLauncher for ProcessLauncher {
    fn player_exists(&self, player: &Path) -> bool {
        player.exists()
    }

    fn launch(&self, player: &Path, args: &[String]) -> Result<(), LaunchError> {
        let child = Command::new(player)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                player: player.to_path_buf(),
                source,
            })?;
        debug!(pid = child.id(), "player process spawned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_exists_is_false_for_missing_file() {
        let launcher = ProcessLauncher::new();
        let missing = std::env::temp_dir().join("definitely-not-a-player-7f3a.exe");
        assert!(!launcher.player_exists(&missing));
    }

    #[test]
    fn test_launch_missing_executable_reports_spawn_error() {
        // Arrange
        let launcher = ProcessLauncher::new();
        let missing = std::env::temp_dir().join("definitely-not-a-player-7f3a.exe");

        // Act
        let result = launcher.launch(&missing, &["http://example.com/v.mkv".to_string()]);

        // Assert
        match result {
            Err(LaunchError::Spawn { player, source }) => {
                assert_eq!(player, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            Ok(()) => panic!("expected a spawn error"),
        }
    }
}
