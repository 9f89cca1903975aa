//! Launcher infrastructure: starting the media player.
//!
//! - [`process`]: spawns a real detached child process.
//! - [`mock`]: records launch requests instead of running anything.  Used by
//!   the unit and integration tests.

pub mod mock;
pub mod process;
