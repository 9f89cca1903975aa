//! HandleUrlUseCase: turns a clicked `mpv://` link into a running player.
//!
//! Pipeline (every step is reported to the [`EventSink`]):
//!
//! 1. Require the literal `mpv://` prefix.
//! 2. Percent-decode the remainder.
//! 3. Confirm the configured player exists, before any argument assembly.
//! 4. Extract the decoded URL's path.  If there is none, override matching
//!    is skipped for this link.
//! 5. Pick the first declared override pattern contained in the path.
//! 6. Assemble `[--user-agent=<override>] <decoded-url>`.
//!
//! [`HandleUrlUseCase::translate`] stops there; [`HandleUrlUseCase::handle`]
//! additionally starts the player through the [`PlayerLauncher`].

use std::path::PathBuf;

use mpv_handler_core::{
    build_arguments, query_unescape, render_command_line, strip_scheme, url_path, DecodeError,
    HandlerConfig,
};
use thiserror::Error;
use tracing::debug;

use super::diagnostics::EventSink;
use super::launch_player::{self, LaunchError, PlayerLauncher};

/// Error type for link handling.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The argument does not start with `mpv://`.
    #[error("invalid scheme: {raw:?} does not start with mpv://")]
    InvalidScheme { raw: String },

    /// The payload contains a malformed percent escape.
    #[error("failed to decode link: {0}")]
    Decode(#[from] DecodeError),

    /// The configured player executable is missing.
    #[error("player not found at {path:?}")]
    PlayerNotFound { path: PathBuf },

    /// The player process could not be created.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// The result of translating one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub player: PathBuf,
    /// Arguments in order; the decoded URL is always last.
    pub args: Vec<String>,
    /// Override pattern that selected the user agent, if any.
    pub matched_pattern: Option<String>,
}

/// The Handle URL use case.
pub struct HandleUrlUseCase<'a> {
    config: &'a HandlerConfig,
    launcher: &'a dyn PlayerLauncher,
    events: &'a dyn EventSink,
}

impl<'a> HandleUrlUseCase<'a> {
    pub fn new(
        config: &'a HandlerConfig,
        launcher: &'a dyn PlayerLauncher,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            launcher,
            events,
        }
    }

    /// Translates `raw` into a [`LaunchPlan`] without starting anything.
    ///
    /// # Errors
    ///
    /// - [`HandleError::InvalidScheme`] when `raw` lacks the `mpv://` prefix.
    /// - [`HandleError::Decode`] for malformed percent escapes.
    /// - [`HandleError::PlayerNotFound`] when the configured player is missing.
    pub fn translate(&self, raw: &str) -> Result<LaunchPlan, HandleError> {
        self.events.record(&format!("Raw URL: {raw}"));

        let Some(payload) = strip_scheme(raw) else {
            self.events.record(&format!("Invalid scheme: {raw}"));
            return Err(HandleError::InvalidScheme {
                raw: raw.to_string(),
            });
        };
        self.events.record(&format!("Stripped URL: {payload}"));

        let decoded = query_unescape(payload).map_err(|e| {
            self.events.record(&format!("Decode error: {e}"));
            e
        })?;
        self.events.record(&format!("Decoded URL: {decoded}"));

        let player = &self.config.player_path;
        if !self.launcher.player_exists(player) {
            self.events
                .record(&format!("Player not found at: {}", player.display()));
            return Err(HandleError::PlayerNotFound {
                path: player.clone(),
            });
        }

        let mut matched_pattern = None;
        let mut user_agent = None;
        match url_path(&decoded) {
            Some(path) => {
                if let Some((pattern, ua)) = self.config.overrides.first_match(&path) {
                    self.events.record(&format!(
                        "Found matching user agent for pattern '{pattern}'. Using user agent: {ua}"
                    ));
                    matched_pattern = Some(pattern.to_string());
                    user_agent = Some(ua);
                } else {
                    debug!(%path, "no override pattern matched");
                }
            }
            None => self
                .events
                .record("Could not parse URL or URL has no path, skipping user agent matching."),
        }

        let args = build_arguments(&decoded, user_agent);
        self.events
            .record(&format!("Executing: {}", render_command_line(player, &args)));

        Ok(LaunchPlan {
            player: player.clone(),
            args,
            matched_pattern,
        })
    }

    /// Translates `raw` and starts the player.
    ///
    /// # Errors
    ///
    /// Any [`HandleError`] from [`translate`](Self::translate), or
    /// [`HandleError::Launch`] if the process cannot be created.
    pub fn handle(&self, raw: &str) -> Result<LaunchPlan, HandleError> {
        let plan = self.translate(raw)?;
        launch_player::dispatch(self.launcher, &plan.player, &plan.args, self.events)?;
        Ok(plan)
    }
}
