//! Logging infrastructure: the optional user-facing event log.
//!
//! This is separate from the `tracing` diagnostics the binary can print to
//! stderr.  The event log is what an end user enables in the config file to
//! find out why a clicked link did nothing, because a browser-launched
//! handler has no visible console.

pub mod event_log;
