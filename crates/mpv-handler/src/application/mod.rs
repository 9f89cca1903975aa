//! Application layer use cases for mpv-handler.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `mpv-handler-core`) and the infrastructure (registry,
//! files, processes).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain functions to fulfil a user goal (e.g., "open
//!   this `mpv://` link in the player").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so tests can substitute in-memory fakes.
//! - **Contain no OS calls**: no registry access, no process spawning, no
//!   file writes.
//!
//! # Sub-modules
//!
//! - **`diagnostics`**       – The [`diagnostics::EventSink`] every use case
//!   reports its progress to.
//! - **`handle_url`**        – Validates, decodes, and translates a link into
//!   a launch plan, then hands it to the launcher.
//! - **`launch_player`**     – The [`launch_player::PlayerLauncher`] seam.
//! - **`register_protocol`** – Installs and removes the `mpv` scheme
//!   association through a [`register_protocol::KeyStore`].

pub mod diagnostics;
pub mod handle_url;
pub mod launch_player;
pub mod register_protocol;
