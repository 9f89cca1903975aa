//! Handler configuration and its INI mapping.
//!
//! The on-disk layout is:
//!
//! ```ini
//! [mpv-handler]
//! mpvPath = C:\Tools\mpv\mpv.exe
//! enableLog = false
//! logPath = C:\Tools\mpv-handler\mpv-handler.log
//!
//! [UserAgents]
//! /hls/ = Mozilla/5.0 (Windows NT 10.0; Win64; x64)
//! ```
//!
//! Loading is forgiving: absent keys fall back to defaults.  Saving is a
//! merge.  The three scalar keys are overwritten in place and the
//! `[UserAgents]` section is replaced wholesale; every other line in the
//! document is left alone.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::codec::ini::{is_representable, IniDocument};

/// Section holding the scalar settings.
pub const MAIN_SECTION: &str = "mpv-handler";
/// Section holding `pattern = user agent` pairs.
pub const OVERRIDES_SECTION: &str = "UserAgents";

pub const KEY_PLAYER_PATH: &str = "mpvPath";
pub const KEY_ENABLE_LOG: &str = "enableLog";
pub const KEY_LOG_PATH: &str = "logPath";

/// File name of the default log, placed next to the executable.
pub const DEFAULT_LOG_FILE_NAME: &str = "mpv-handler.log";

/// Returns the default log file path for an executable directory.
pub fn default_log_path(exe_dir: &Path) -> PathBuf {
    exe_dir.join(DEFAULT_LOG_FILE_NAME)
}

/// Parses the boolean spellings accepted in the config file.
///
/// Returns `None` for anything unrecognised.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ── Override map ──────────────────────────────────────────────────────────────

/// Ordered `pattern → override` pairs.
///
/// Patterns are plain substrings matched against a URL path.  Iteration
/// follows declaration order, which makes "first match wins" deterministic.
/// Matching is case-sensitive and patterns keep the spelling they were
/// written with; only section and scalar key names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: IndexMap<String, String>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a pattern.  A replaced pattern keeps its position.
    pub fn insert(&mut self, pattern: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(pattern.into(), value.into())
    }

    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.entries.get(pattern).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the first declared `(pattern, value)` whose pattern occurs in `path`.
    pub fn first_match(&self, path: &str) -> Option<(&str, &str)> {
        self.iter().find(|(pattern, _)| path.contains(pattern))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ── Handler configuration ─────────────────────────────────────────────────────

/// Settings for one handler installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Player executable.  Empty means "not configured yet".
    pub player_path: PathBuf,
    /// Whether events are appended to `log_path`.
    pub logging_enabled: bool,
    pub log_path: PathBuf,
    pub overrides: OverrideMap,
}

impl HandlerConfig {
    /// First-run configuration: no player, logging off, empty override map.
    pub fn with_log_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            player_path: PathBuf::new(),
            logging_enabled: false,
            log_path: log_path.into(),
            overrides: OverrideMap::new(),
        }
    }

    /// Reads the configuration out of a parsed document.
    ///
    /// Missing or empty `logPath` resolves to `default_log_path`; an
    /// unrecognised `enableLog` value reads as `false`.
    pub fn from_document(doc: &IniDocument, default_log_path: &Path) -> Self {
        let player_path = doc
            .get(MAIN_SECTION, KEY_PLAYER_PATH)
            .map(PathBuf::from)
            .unwrap_or_default();
        let logging_enabled = doc
            .get(MAIN_SECTION, KEY_ENABLE_LOG)
            .and_then(parse_bool)
            .unwrap_or(false);
        let log_path = doc
            .get(MAIN_SECTION, KEY_LOG_PATH)
            .filter(|value| !value.is_empty())
            .map_or_else(|| default_log_path.to_path_buf(), PathBuf::from);
        let overrides = doc.entries(OVERRIDES_SECTION).collect();

        Self {
            player_path,
            logging_enabled,
            log_path,
            overrides,
        }
    }

    /// Writes this configuration into `doc`, leaving foreign content intact.
    ///
    /// Override pairs that cannot be written as a parseable INI line (see
    /// [`is_representable`]) are left out and returned, so one bad pattern
    /// never makes the whole file unreadable.
    pub fn merge_into(&self, doc: &mut IniDocument) -> Vec<String> {
        doc.set(
            MAIN_SECTION,
            KEY_PLAYER_PATH,
            &self.player_path.to_string_lossy(),
        );
        doc.set(
            MAIN_SECTION,
            KEY_ENABLE_LOG,
            if self.logging_enabled { "true" } else { "false" },
        );
        doc.set(MAIN_SECTION, KEY_LOG_PATH, &self.log_path.to_string_lossy());

        doc.remove_section(OVERRIDES_SECTION);
        doc.add_section(OVERRIDES_SECTION);
        let mut skipped = Vec::new();
        for (pattern, value) in self.overrides.iter() {
            if is_representable(pattern, value) {
                doc.append(OVERRIDES_SECTION, pattern, value);
            } else {
                skipped.push(pattern.to_string());
            }
        }
        skipped
    }
}
