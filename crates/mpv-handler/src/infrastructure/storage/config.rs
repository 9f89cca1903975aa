//! INI-based configuration persistence.
//!
//! The file lives next to the executable and shares its base name:
//!
//! ```text
//! C:\Tools\mpv-handler\mpv-handler.exe
//! C:\Tools\mpv-handler\mpv-handler.ini   ← config
//! C:\Tools\mpv-handler\mpv-handler.log   ← default event log
//! ```
//!
//! # Load vs. save (for beginners)
//!
//! [`ConfigStore::load`] never fails.  On a fresh installation there is no
//! file yet, and a broken file should not stop links from opening, so both
//! cases produce the first-run defaults.
//!
//! [`ConfigStore::save`] re-reads the file and merges into it instead of
//! overwriting.  A user may have added comments or extra sections by hand;
//! only the keys this program owns are touched.

use std::io;
use std::path::{Path, PathBuf};

use mpv_handler_core::domain::config::default_log_path;
use mpv_handler_core::{HandlerConfig, IniDocument};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension of the config file.
pub const CONFIG_EXTENSION: &str = "ini";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The executable path has no parent directory or no file name.
    #[error("cannot derive config location from executable path {0}")]
    NoExecutableDir(PathBuf),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads and writes the handler configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    default_log_path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for an explicit file location.
    pub fn new(path: impl Into<PathBuf>, default_log_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_log_path: default_log_path.into(),
        }
    }

    /// Creates the store for `<exe-dir>/<exe-stem>.ini`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoExecutableDir`] if `exe` has no parent
    /// directory or file stem.
    pub fn for_executable(exe: &Path) -> Result<Self, ConfigError> {
        let no_dir = || ConfigError::NoExecutableDir(exe.to_path_buf());
        let dir = exe.parent().ok_or_else(no_dir)?;
        let stem = exe.file_stem().ok_or_else(no_dir)?;
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(CONFIG_EXTENSION);
        Ok(Self::new(dir.join(file_name), default_log_path(dir)))
    }

    /// Location of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, falling back to defaults on any read or
    /// parse failure.
    pub fn load(&self) -> HandlerConfig {
        match self.read_document() {
            Some(doc) => HandlerConfig::from_document(&doc, &self.default_log_path),
            None => HandlerConfig::with_log_path(&self.default_log_path),
        }
    }

    /// Persists `config`, preserving content of the existing file that it
    /// does not own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn save(&self, config: &HandlerConfig) -> Result<(), ConfigError> {
        let mut doc = self.read_document().unwrap_or_default();
        for pattern in config.merge_into(&mut doc) {
            warn!(pattern = %pattern, "override pattern cannot be written to the config file, skipped");
        }

        std::fs::write(&self.path, doc.to_string()).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn read_document(&self) -> Option<IniDocument> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "config unreadable, using defaults");
                return None;
            }
        };
        match IniDocument::parse(&text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "config malformed, using defaults");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("mpv-handler-cfg-{}", Uuid::new_v4()));
            std::fs::create_dir_all(&dir).expect("create temp dir");
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::for_executable(&dir.0.join("mpv-handler.exe")).expect("store")
    }

    #[test]
    fn test_for_executable_derives_sibling_paths() {
        let store = ConfigStore::for_executable(Path::new("/opt/tools/my-handler.exe")).expect("store");

        assert_eq!(store.path(), Path::new("/opt/tools/my-handler.ini"));
        assert_eq!(
            store.load().log_path,
            PathBuf::from("/opt/tools/mpv-handler.log")
        );
    }

    #[test]
    fn test_for_executable_without_extension_appends_ini() {
        let store = ConfigStore::for_executable(Path::new("/usr/local/bin/mpv-handler")).expect("store");
        assert_eq!(store.path(), Path::new("/usr/local/bin/mpv-handler.ini"));
    }

    #[test]
    fn test_for_executable_keeps_dots_in_stem() {
        let store = ConfigStore::for_executable(Path::new("/opt/mpv.handler.exe")).expect("store");
        assert_eq!(store.path(), Path::new("/opt/mpv.handler.ini"));
    }

    #[test]
    fn test_for_executable_rejects_root_path() {
        let result = ConfigStore::for_executable(Path::new("/"));
        assert!(matches!(result, Err(ConfigError::NoExecutableDir(_))));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        // Arrange
        let dir = TempDir::new();
        let store = store_in(&dir);

        // Act
        let cfg = store.load();

        // Assert
        assert_eq!(cfg, HandlerConfig::with_log_path(dir.0.join("mpv-handler.log")));
    }

    #[test]
    fn test_load_malformed_file_returns_defaults() {
        let dir = TempDir::new();
        let store = store_in(&dir);
        std::fs::write(store.path(), "[mpv-handler\nmpvPath = x\n").expect("seed");

        let cfg = store.load();

        assert_eq!(cfg.player_path, PathBuf::new());
        assert!(!cfg.logging_enabled);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        // Arrange
        let dir = TempDir::new();
        let store = store_in(&dir);
        let mut cfg = store.load();
        cfg.player_path = PathBuf::from("/usr/bin/mpv");
        cfg.logging_enabled = true;
        cfg.overrides.insert("/hls/", "Mozilla/5.0 (X11; Linux x86_64)");
        cfg.overrides.insert("cdn;1", "Agent # literal");

        // Act
        store.save(&cfg).expect("save");
        let loaded = store.load();

        // Assert
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_save_preserves_foreign_content() {
        // Arrange
        let dir = TempDir::new();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "; hand-written notes\n[mpv-handler]\nmpvPath = old\ntheme = dark\n\n[Extra]\nkeep = me\n",
        )
        .expect("seed");
        let mut cfg = store.load();
        cfg.player_path = PathBuf::from("/new/mpv");

        // Act
        store.save(&cfg).expect("save");

        // Assert
        let text = std::fs::read_to_string(store.path()).expect("read");
        assert!(text.starts_with("; hand-written notes\n"));
        assert!(text.contains("theme = dark"));
        assert!(text.contains("[Extra]\nkeep = me"));
        assert!(text.contains("/new/mpv"));
        assert!(!text.contains("= old"));
    }

    #[test]
    fn test_save_replaces_override_section() {
        let dir = TempDir::new();
        let store = store_in(&dir);
        std::fs::write(store.path(), "[UserAgents]\nstale = gone\n").expect("seed");
        let mut cfg = store.load();
        cfg.overrides = [("fresh", "kept")].into_iter().collect();

        store.save(&cfg).expect("save");

        let loaded = store.load();
        assert_eq!(loaded.overrides.len(), 1);
        assert_eq!(loaded.overrides.get("fresh"), Some("kept"));
    }

    #[test]
    fn test_save_with_unwritable_pattern_keeps_player_path() {
        // Arrange
        let dir = TempDir::new();
        let store = store_in(&dir);
        let mut cfg = store.load();
        cfg.player_path = PathBuf::from("/usr/bin/mpv");
        cfg.overrides.insert("=\"```", "dropped");
        cfg.overrides.insert("a=b`c\"", "kept");

        // Act
        store.save(&cfg).expect("save");
        let loaded = store.load();

        // Assert
        assert_eq!(loaded.player_path, PathBuf::from("/usr/bin/mpv"));
        assert_eq!(loaded.overrides.len(), 1);
        assert_eq!(loaded.overrides.get("a=b`c\""), Some("kept"));
    }

    #[test]
    fn test_save_into_missing_directory_fails_with_io_error() {
        let dir = TempDir::new();
        let store = ConfigStore::new(dir.0.join("missing").join("cfg.ini"), dir.0.join("x.log"));

        let result = store.save(&HandlerConfig::with_log_path(dir.0.join("x.log")));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
