//! Command-line surface: argument parsing and exit-code mapping.
//!
//! | Invocation                  | Effect                              | Exit |
//! |-----------------------------|-------------------------------------|------|
//! | *(none)*                    | print usage                         | 0    |
//! | `--install <player>`        | save player path, register `mpv://` | 0/1  |
//! | `--uninstall`               | remove the registration             | 0/1  |
//! | `<link>`                    | translate the link, start player    | 0/2  |
//!
//! # Two audiences (for beginners)
//!
//! `--install` and `--uninstall` are typed by a person in a terminal, so
//! failures are printed to stderr.  A link, on the other hand, is passed in
//! by the browser with no console attached.  Printing there could pop up an
//! error window, so link failures only go to the optional event log and the
//! exit code.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use mpv_handler_core::HandlerConfig;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::handle_url::HandleUrlUseCase;
use crate::application::launch_player::PlayerLauncher;
use crate::application::register_protocol::{KeyStore, ProtocolRegistrar};
use crate::infrastructure::logging::event_log::FileEventLog;
use crate::infrastructure::storage::config::ConfigStore;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    /// Usage, install, or uninstall failure.
    pub const FAILURE: u8 = 1;
    /// A link could not be translated or the player could not be started.
    pub const HANDLING_FAILED: u8 = 2;
}

pub const INSTALL_FLAG: &str = "--install";
pub const UNINSTALL_FLAG: &str = "--uninstall";

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Usage,
    Install { player: PathBuf },
    Uninstall,
    Handle { link: String },
}

/// Error type for malformed command lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Usage: mpv-handler --install \"<path-to-mpv.exe>\"")]
    InstallArguments,
}

/// Parses the arguments that follow the program name.
///
/// Anything that is not a recognised flag is treated as a link; arguments
/// after the link are ignored.
///
/// # Errors
///
/// Returns [`UsageError::InstallArguments`] unless `--install` is followed by
/// exactly one argument.
pub fn parse_args<I, S>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let Some(first) = args.first() else {
        return Ok(Command::Usage);
    };

    match first.as_str() {
        INSTALL_FLAG => match &args[1..] {
            [player] => Ok(Command::Install {
                player: PathBuf::from(player),
            }),
            _ => Err(UsageError::InstallArguments),
        },
        UNINSTALL_FLAG => Ok(Command::Uninstall),
        _ => Ok(Command::Handle {
            link: first.clone(),
        }),
    }
}

/// Resolves a relative path against the current working directory.
fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Executes [`Command`]s against one installation.
///
/// The configuration is loaded once on construction and handed by reference
/// to every use case.
pub struct Handler<S: KeyStore, L: PlayerLauncher> {
    exe_path: PathBuf,
    config_store: ConfigStore,
    config: HandlerConfig,
    registrar: ProtocolRegistrar<S>,
    launcher: L,
}

impl<S: KeyStore, L: PlayerLauncher> Handler<S, L> {
    pub fn new(exe_path: impl Into<PathBuf>, config_store: ConfigStore, key_store: S, launcher: L) -> Self {
        let config = config_store.load();
        Self {
            exe_path: exe_path.into(),
            config_store,
            config,
            registrar: ProtocolRegistrar::new(key_store),
            launcher,
        }
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn key_store(&self) -> &S {
        self.registrar.store()
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs `command`, writing user-facing text to `out`/`err`, and returns
    /// the process exit code.
    pub fn run(&mut self, command: Command, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
        match command {
            Command::Usage => {
                let _ = self.write_usage(out);
                exit_code::SUCCESS
            }
            Command::Install { player } => match self.install(&player) {
                Ok(()) => {
                    let _ = writeln!(out, "Protocol installed and mpv path saved.");
                    exit_code::SUCCESS
                }
                Err(e) => {
                    let _ = writeln!(err, "Install failed: {e:#}");
                    exit_code::FAILURE
                }
            },
            Command::Uninstall => match self.uninstall() {
                Ok(()) => {
                    let _ = writeln!(out, "Protocol uninstalled.");
                    exit_code::SUCCESS
                }
                Err(e) => {
                    let _ = writeln!(err, "Uninstall failed: {e:#}");
                    exit_code::FAILURE
                }
            },
            Command::Handle { link } => self.handle(&link),
        }
    }

    fn install(&mut self, player: &Path) -> anyhow::Result<()> {
        let player = absolutize(player).context("failed to resolve mpv path")?;
        if !self.launcher.player_exists(&player) {
            bail!("mpv not found at the specified path: {}", player.display());
        }

        self.config.player_path = player;
        self.config_store
            .save(&self.config)
            .context("failed to save config")?;
        self.registrar
            .install(&self.exe_path)
            .context("failed to register the mpv:// protocol")?;
        info!(player = %self.config.player_path.display(), "installed");
        Ok(())
    }

    fn uninstall(&self) -> anyhow::Result<()> {
        self.registrar
            .uninstall()
            .context("failed to unregister the mpv:// protocol")
    }

    fn handle(&self, link: &str) -> u8 {
        let events = FileEventLog::new(self.config.logging_enabled, &self.config.log_path);
        let use_case = HandleUrlUseCase::new(&self.config, &self.launcher, &events);
        match use_case.handle(link) {
            Ok(plan) => {
                debug!(args = ?plan.args, "link handled");
                exit_code::SUCCESS
            }
            Err(e) => {
                debug!(error = %e, "link handling failed");
                exit_code::HANDLING_FAILED
            }
        }
    }

    fn write_usage(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "mpv-handler: A protocol handler for mpv.")?;
        writeln!(out, "Usage:")?;
        writeln!(
            out,
            "  mpv-handler --install \"<full-path-to-mpv.exe>\"   : Register the mpv:// protocol."
        )?;
        writeln!(
            out,
            "  mpv-handler --uninstall                          : Unregister the mpv:// protocol."
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "This program is usually not called by users directly, but by a web browser via the protocol."
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Configuration is stored in {}.",
            self.config_store.path().display()
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
