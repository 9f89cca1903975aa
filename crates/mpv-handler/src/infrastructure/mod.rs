//! Infrastructure layer for mpv-handler.
//!
//! Contains OS-facing adapters: the registry, the config and log files, and
//! process creation.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mpv_handler_core`, but MUST NOT be imported by the `application` or
//! domain layers (test code excepted).

pub mod launcher;
pub mod logging;
pub mod registry;
pub mod storage;
