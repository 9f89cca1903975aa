//! Domain rules for mpv-handler.
//!
//! - **`config`** – The typed configuration record and how it maps onto the
//!   INI document on disk.
//! - **`invocation`** – How a raw `mpv://` argument becomes the player's
//!   argument vector.
//!
//! Nothing in here touches the file system, the registry, or processes.

pub mod config;
pub mod invocation;
