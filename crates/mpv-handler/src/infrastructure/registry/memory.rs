//! In-memory key store for unit testing.
//!
//! Behaves like the parts of the Windows registry that protocol
//! registration relies on:
//!
//! - key paths are `\`-separated and compared case-insensitively,
//! - creating a key creates its missing ancestors,
//! - deleting a key that still has subkeys fails,
//! - deleting or writing to a missing key reports [`StoreError::NotFound`].
//!
//! Every call is appended to a journal so tests can assert on ordering, and
//! failures can be injected per path.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::application::register_protocol::{KeyStore, StoreError};

/// One call made against the store, recorded whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    CreateKey(String),
    SetValue {
        path: String,
        name: String,
        value: String,
    },
    DeleteKey(String),
}

#[derive(Debug, Default)]
struct Inner {
    /// Normalised path → (value name, lowercased) → value.
    keys: BTreeMap<String, BTreeMap<String, String>>,
    journal: Vec<StoreOp>,
    failing: HashSet<String>,
}

/// A mock implementation of [`KeyStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    inner: Mutex<Inner>,
}

fn normalise(path: &str) -> String {
    path.to_ascii_lowercase()
}

fn validate(path: &str) -> Result<(), StoreError> {
    if path.is_empty() || path.split('\\').any(str::is_empty) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

impl MemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later operation on exactly `path` fail with an I/O error.
    pub fn inject_failure(&self, path: &str) {
        self.lock().failing.insert(normalise(path));
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    pub fn key_exists(&self, path: &str) -> bool {
        self.lock().keys.contains_key(&normalise(path))
    }

    /// Reads a value; `""` names the default value.
    pub fn value(&self, path: &str, name: &str) -> Option<String> {
        self.lock()
            .keys
            .get(&normalise(path))?
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    /// Number of keys currently present.
    pub fn key_count(&self) -> usize {
        self.lock().keys.len()
    }

    /// Returns every call made so far (oldest first).
    pub fn journal(&self) -> Vec<StoreOp> {
        self.lock().journal.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("lock poisoned")
    }
}

impl Inner {
    fn check_injected(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.contains(key) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "injected failure",
            )));
        }
        Ok(())
    }
}

impl KeyStore for MemoryKeyStore {
    fn create_key(&self, path: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.journal.push(StoreOp::CreateKey(path.to_string()));
        validate(path)?;
        let key = normalise(path);
        inner.check_injected(&key)?;

        let mut prefix = String::new();
        for segment in key.split('\\') {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(segment);
            inner.keys.entry(prefix.clone()).or_default();
        }
        Ok(())
    }

    fn set_value(&self, path: &str, name: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.journal.push(StoreOp::SetValue {
            path: path.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
        validate(path)?;
        let key = normalise(path);
        inner.check_injected(&key)?;

        let values = inner.keys.get_mut(&key).ok_or(StoreError::NotFound)?;
        values.insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    fn delete_key(&self, path: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.journal.push(StoreOp::DeleteKey(path.to_string()));
        validate(path)?;
        let key = normalise(path);
        inner.check_injected(&key)?;

        if !inner.keys.contains_key(&key) {
            return Err(StoreError::NotFound);
        }
        let child_prefix = format!("{key}\\");
        if inner.keys.keys().any(|k| k.starts_with(&child_prefix)) {
            return Err(StoreError::HasSubkeys);
        }
        inner.keys.remove(&key);
        Ok(())
    }
}
