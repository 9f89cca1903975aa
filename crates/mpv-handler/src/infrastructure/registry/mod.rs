//! Registry infrastructure: where the `mpv` scheme association is stored.
//!
//! - [`memory`]: in-memory [`KeyStore`] that enforces the registry's
//!   "no delete while subkeys exist" rule.  Used by tests.
//! - `windows`: `HKEY_CLASSES_ROOT` via `winreg` (Windows only).
//! - [`UnsupportedKeyStore`]: every operation fails.  Used on platforms
//!   without a shell-registration store.
//!
//! [`PlatformKeyStore`] names whichever of these the binary should use.

use crate::application::register_protocol::{KeyStore, StoreError};

pub mod memory;

#[cfg(target_os = "windows")]
pub mod windows;

/// The key store used by the binary on this platform.
#[cfg(target_os = "windows")]
pub type PlatformKeyStore = windows::ClassesRootStore;

/// The key store used by the binary on this platform.
#[cfg(not(target_os = "windows"))]
pub type PlatformKeyStore = UnsupportedKeyStore;

/// Key store for platforms without a URL-protocol registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedKeyStore;

impl UnsupportedKeyStore {
    pub fn new() -> Self {
        Self
    }

    fn error() -> StoreError {
        StoreError::Unsupported(format!(
            "URL-protocol registration is only available on Windows (running on {})",
            std::env::consts::OS
        ))
    }
}

impl KeyStore for UnsupportedKeyStore {
    fn create_key(&self, _path: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn set_value(&self, _path: &str, _name: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn delete_key(&self, _path: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }
}
