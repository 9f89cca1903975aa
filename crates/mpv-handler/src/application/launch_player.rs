//! Invocation dispatch: starting the player with a translated argument vector.
//!
//! The use case only decides *what* to run.  Starting the process is
//! delegated to a [`PlayerLauncher`] so the pipeline can be exercised in tests
//! without spawning anything.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::diagnostics::EventSink;

/// Error type for player launch operations.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The OS refused to create the process.
    #[error("failed to start player {player}: {source}")]
    Spawn {
        player: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Abstraction over "does the player exist" and "start it".
///
/// The production implementation lives in `infrastructure::launcher`.
pub trait PlayerLauncher {
    /// Returns `true` when `player` names an existing file system entry.
    fn player_exists(&self, player: &Path) -> bool;

    /// Starts `player` with `args` and returns without waiting for it.
    ///
    /// The child's standard streams are not captured.
    fn launch(&self, player: &Path, args: &[String]) -> Result<(), LaunchError>;
}

/// Starts the player and reports the outcome to `events`.
///
/// # Errors
///
/// Returns [`LaunchError`] if process creation fails.
pub fn dispatch(
    launcher: &dyn PlayerLauncher,
    player: &Path,
    args: &[String],
    events: &dyn EventSink,
) -> Result<(), LaunchError> {
    match launcher.launch(player, args) {
        Ok(()) => {
            debug!(player = %player.display(), "player started");
            Ok(())
        }
        Err(e) => {
            warn!("{e}");
            events.record(&format!("Launch failed: {e}"));
            Err(e)
        }
    }
}
