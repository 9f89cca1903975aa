//! RegisterProtocolUseCase: installs and removes the `mpv` scheme association.
//!
//! Windows finds URL-protocol handlers under `HKEY_CLASSES_ROOT`:
//!
//! ```text
//! mpv                      (default) = "URL:Mpv-OpenList Protocol"
//! │                        URL Protocol = ""
//! ├─ DefaultIcon           (default) = "C:\...\mpv-handler.exe,0"
//! └─ shell
//!    └─ open
//!       └─ command         (default) = "\"C:\...\mpv-handler.exe\" \"%1\""
//! ```
//!
//! # Ordering (for beginners)
//!
//! The registry refuses to delete a key that still has subkeys, so uninstall
//! walks the tree leaf-first: `command`, `open`, `shell`, `DefaultIcon`, and
//! finally `mpv` itself.  Install goes the other way, root first.
//!
//! Both directions are idempotent.  Install simply overwrites the same keys
//! and values; uninstall treats "key not found" as already done.  A failure
//! midway leaves whatever was already written, and re-running the same
//! command repairs it.
//!
//! ```text
//! Unregistered ──install──► Registered
//!      ▲                        │
//!      └───────uninstall────────┘
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

/// Root key of the scheme, directly under the classes root.
pub const SCHEME_KEY: &str = "mpv";
pub const ICON_KEY: &str = r"mpv\DefaultIcon";
pub const COMMAND_KEY: &str = r"mpv\shell\open\command";

/// Default value of [`SCHEME_KEY`].
pub const PROTOCOL_DESCRIPTION: &str = "URL:Mpv-OpenList Protocol";
/// Empty-string value whose presence marks the key as a URL protocol.
pub const URL_PROTOCOL_MARKER: &str = "URL Protocol";

/// Deletion order for uninstall: every key before its parent.
pub const UNINSTALL_ORDER: [&str; 5] = [
    r"mpv\shell\open\command",
    r"mpv\shell\open",
    r"mpv\shell",
    r"mpv\DefaultIcon",
    "mpv",
];

/// Error type for key store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found")]
    NotFound,
    #[error("key still has subkeys")]
    HasSubkeys,
    #[error("invalid key path {0:?}")]
    InvalidPath(String),
    #[error("platform not supported: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Hierarchical key/value store rooted at the classes root.
///
/// Paths use `\` as the separator.  The Windows registry is the production
/// implementation; tests use `infrastructure::registry::memory::MemoryKeyStore`.
pub trait KeyStore {
    /// Creates `path` and any missing ancestors.  Existing keys are kept.
    fn create_key(&self, path: &str) -> Result<(), StoreError>;

    /// Sets a string value on an existing key.  `""` names the default value.
    fn set_value(&self, path: &str, name: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes a key that has no subkeys.
    fn delete_key(&self, path: &str) -> Result<(), StoreError>;
}

/// Error type for protocol (de)registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("failed to create registry key '{path}'")]
    CreateKey {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to set value {name:?} on registry key '{path}'")]
    SetValue {
        path: String,
        name: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to delete registry key '{path}'")]
    DeleteKey {
        path: String,
        #[source]
        source: StoreError,
    },
}

/// `"<exe>,0"`: first icon resource of the executable.
pub fn icon_value(exe: &Path) -> String {
    format!("{},0", exe.display())
}

/// `"\"<exe>\" \"%1\""`: the shell substitutes the clicked link for `%1`.
pub fn command_value(exe: &Path) -> String {
    format!("\"{}\" \"%1\"", exe.display())
}

/// The Register Protocol use case.
pub struct ProtocolRegistrar<S: KeyStore> {
    store: S,
}

impl<S: KeyStore> ProtocolRegistrar<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers `exe` as the handler for `mpv://` links.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`]; keys written before the
    /// failure are left in place.
    pub fn install(&self, exe: &Path) -> Result<(), RegistrationError> {
        self.create(SCHEME_KEY)?;
        self.set(SCHEME_KEY, "", PROTOCOL_DESCRIPTION)?;
        self.set(SCHEME_KEY, URL_PROTOCOL_MARKER, "")?;

        self.create(ICON_KEY)?;
        self.set(ICON_KEY, "", &icon_value(exe))?;

        self.create(COMMAND_KEY)?;
        self.set(COMMAND_KEY, "", &command_value(exe))?;

        info!(exe = %exe.display(), "mpv:// protocol registered");
        Ok(())
    }

    /// Removes the `mpv://` registration.
    ///
    /// Keys that are already gone are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DeleteKey`] for the first deletion that
    /// fails for any reason other than "not found"; later keys are untouched.
    pub fn uninstall(&self) -> Result<(), RegistrationError> {
        for path in UNINSTALL_ORDER {
            match self.store.delete_key(path) {
                Ok(()) => debug!(path, "registry key deleted"),
                Err(StoreError::NotFound) => debug!(path, "registry key already absent"),
                Err(source) => {
                    return Err(RegistrationError::DeleteKey {
                        path: path.to_string(),
                        source,
                    })
                }
            }
        }
        info!("mpv:// protocol unregistered");
        Ok(())
    }

    fn create(&self, path: &str) -> Result<(), RegistrationError> {
        self.store
            .create_key(path)
            .map_err(|source| RegistrationError::CreateKey {
                path: path.to_string(),
                source,
            })
    }

    fn set(&self, path: &str, name: &str, value: &str) -> Result<(), RegistrationError> {
        self.store
            .set_value(path, name, value)
            .map_err(|source| RegistrationError::SetValue {
                path: path.to_string(),
                name: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::memory::{MemoryKeyStore, StoreOp};

    const EXE: &str = r"C:\Tools\mpv-handler.exe";

    fn registrar() -> ProtocolRegistrar<MemoryKeyStore> {
        ProtocolRegistrar::new(MemoryKeyStore::new())
    }

    #[test]
    fn test_command_value_quotes_path_and_placeholder() {
        assert_eq!(
            command_value(Path::new(EXE)),
            r#""C:\Tools\mpv-handler.exe" "%1""#
        );
        assert_eq!(icon_value(Path::new(EXE)), r"C:\Tools\mpv-handler.exe,0");
    }

    #[test]
    fn test_install_writes_expected_values() {
        // Arrange
        let reg = registrar();

        // Act
        reg.install(Path::new(EXE)).expect("install");

        // Assert
        let store = reg.store();
        assert_eq!(store.value("mpv", "").as_deref(), Some(PROTOCOL_DESCRIPTION));
        assert_eq!(store.value("mpv", "URL Protocol").as_deref(), Some(""));
        assert_eq!(
            store.value(ICON_KEY, "").as_deref(),
            Some(r"C:\Tools\mpv-handler.exe,0")
        );
        assert_eq!(
            store.value(COMMAND_KEY, "").as_deref(),
            Some(r#""C:\Tools\mpv-handler.exe" "%1""#)
        );
        assert_eq!(store.key_count(), 5);
    }

    #[test]
    fn test_install_creates_root_before_children() {
        let reg = registrar();

        reg.install(Path::new(EXE)).expect("install");

        let created: Vec<String> = reg
            .store()
            .journal()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::CreateKey(path) => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(created, vec!["mpv", ICON_KEY, COMMAND_KEY]);
    }

    #[test]
    fn test_install_twice_is_idempotent() {
        let reg = registrar();

        reg.install(Path::new(EXE)).expect("first install");
        reg.install(Path::new(r"D:\moved\mpv-handler.exe"))
            .expect("second install");

        assert_eq!(reg.store().key_count(), 5);
        assert_eq!(
            reg.store().value(COMMAND_KEY, "").as_deref(),
            Some(r#""D:\moved\mpv-handler.exe" "%1""#)
        );
    }

    #[test]
    fn test_install_aborts_at_first_failure() {
        // Arrange
        let store = MemoryKeyStore::new();
        store.inject_failure(ICON_KEY);
        let reg = ProtocolRegistrar::new(store);

        // Act
        let err = reg.install(Path::new(EXE)).unwrap_err();

        // Assert
        assert!(matches!(err, RegistrationError::CreateKey { ref path, .. } if path == ICON_KEY));
        assert!(reg.store().key_exists("mpv"));
        assert!(!reg.store().key_exists(COMMAND_KEY));
    }

    #[test]
    fn test_uninstall_deletes_leaf_first() {
        // Arrange
        let reg = registrar();
        reg.install(Path::new(EXE)).expect("install");

        // Act
        reg.uninstall().expect("uninstall");

        // Assert
        let deleted: Vec<String> = reg
            .store()
            .journal()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::DeleteKey(path) => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(deleted, UNINSTALL_ORDER.to_vec());
        assert_eq!(reg.store().key_count(), 0);
    }

    #[test]
    fn test_uninstall_when_never_installed_succeeds() {
        let reg = registrar();
        reg.uninstall().expect("uninstall on a clean store");
        assert_eq!(reg.store().key_count(), 0);
    }

    #[test]
    fn test_install_uninstall_uninstall_all_succeed() {
        let reg = registrar();

        reg.install(Path::new(EXE)).expect("install");
        reg.uninstall().expect("first uninstall");
        reg.uninstall().expect("second uninstall");

        assert!(!reg.store().key_exists("mpv"));
    }

    #[test]
    fn test_uninstall_stops_at_non_not_found_error() {
        // Arrange
        let store = MemoryKeyStore::new();
        let reg = ProtocolRegistrar::new(store);
        reg.install(Path::new(EXE)).expect("install");
        reg.store().inject_failure(r"mpv\shell");

        // Act
        let err = reg.uninstall().unwrap_err();

        // Assert – command and open are gone, everything from shell up remains
        assert!(matches!(err, RegistrationError::DeleteKey { ref path, .. } if path == r"mpv\shell"));
        assert!(!reg.store().key_exists(COMMAND_KEY));
        assert!(!reg.store().key_exists(r"mpv\shell\open"));
        assert!(reg.store().key_exists(r"mpv\shell"));
        assert!(reg.store().key_exists(ICON_KEY));
        assert!(reg.store().key_exists("mpv"));
    }

    #[test]
    fn test_partial_uninstall_is_repaired_by_rerun() {
        let reg = registrar();
        reg.install(Path::new(EXE)).expect("install");
        reg.store().inject_failure(ICON_KEY);
        assert!(reg.uninstall().is_err());

        reg.store().clear_failures();
        reg.uninstall().expect("rerun");

        assert_eq!(reg.store().key_count(), 0);
    }
}
