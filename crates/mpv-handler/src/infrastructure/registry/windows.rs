//! Windows registry store rooted at `HKEY_CLASSES_ROOT`.
//!
//! Writing under the classes root normally requires an elevated process.
//! Access-denied errors are passed through as [`StoreError::Io`] so the
//! caller can report them.

#![cfg(target_os = "windows")]

use std::io;

use winreg::enums::{HKEY_CLASSES_ROOT, KEY_SET_VALUE};
use winreg::RegKey;

use crate::application::register_protocol::{KeyStore, StoreError};

/// [`KeyStore`] backed by the real registry.
pub struct ClassesRootStore {
    root: RegKey,
}

impl ClassesRootStore {
    pub fn new() -> Self {
        Self {
            root: RegKey::predef(HKEY_CLASSES_ROOT),
        }
    }
}

impl Default for ClassesRootStore {
    fn default() -> Self {
        Self::new()
    }
}

fn map_err(e: io::Error) -> StoreError {
    match e.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound,
        _ => StoreError::Io(e),
    }
}

impl KeyStore for ClassesRootStore {
    fn create_key(&self, path: &str) -> Result<(), StoreError> {
        self.root.create_subkey(path).map_err(map_err)?;
        Ok(())
    }

    fn set_value(&self, path: &str, name: &str, value: &str) -> Result<(), StoreError> {
        let key = self
            .root
            .open_subkey_with_flags(path, KEY_SET_VALUE)
            .map_err(map_err)?;
        key.set_value(name, &value.to_string()).map_err(StoreError::Io)
    }

    fn delete_key(&self, path: &str) -> Result<(), StoreError> {
        self.root.delete_subkey(path).map_err(map_err)
    }
}
