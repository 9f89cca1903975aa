//! # mpv-handler-core
//!
//! Shared library for mpv-handler containing the configuration document
//! model, URL percent-decoding, and the rules that turn an `mpv://` link
//! into the argument vector handed to the media player.
//!
//! It has zero dependencies on OS APIs: no registry, no process spawning,
//! no file system access.  Those live in the `mpv-handler` crate.
//!
//! # Architecture overview (for beginners)
//!
//! mpv-handler is a custom URL-protocol handler.  The operating system is
//! told that links starting with `mpv://` should be opened by our
//! executable.  When a user clicks such a link, the browser starts
//! mpv-handler with the whole link as its only argument.  We unwrap the real
//! video URL hidden inside it, optionally pick a per-site user agent, and
//! start the player.
//!
//! - **`codec`** – Text formats.  `ini` reads and writes the configuration
//!   file without destroying comments or sections we do not own.  `percent`
//!   reverses `%XX` / `+` escaping the same way URL query components do.
//!
//! - **`domain`** – Pure rules.  `config` maps the INI document to a typed
//!   [`HandlerConfig`] and back; `invocation` performs scheme checking,
//!   override selection, and argument assembly.

pub mod codec;
pub mod domain;

pub use codec::ini::{IniDocument, IniError};
pub use codec::percent::{path_unescape, query_unescape, DecodeError};
pub use domain::config::{HandlerConfig, OverrideMap};
pub use domain::invocation::{
    build_arguments, render_command_line, strip_scheme, url_path, SCHEME_PREFIX,
    USER_AGENT_FLAG,
};
