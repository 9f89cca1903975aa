//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module is a thin adapter between [`HandlerConfig`] and
//! the `.ini` file that sits next to the executable.  It handles:
//!
//! - Deriving the file location from the executable's own path.
//! - Lenient loading: a missing or malformed file is a normal first run.
//! - Merge-on-save, so foreign sections and comments survive an install.
//!
//! [`HandlerConfig`]: mpv_handler_core::HandlerConfig

pub mod config;
