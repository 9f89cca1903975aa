//! Format-preserving INI documents.
//!
//! The handler's configuration file is a plain INI file that users edit by
//! hand.  When the handler saves its own settings it must not throw away
//! comments, blank lines, or sections it knows nothing about, so this module
//! keeps every parsed line and only re-renders the entries that were changed.
//!
//! Syntax accepted:
//!
//! ```text
//! ; comment            # comment
//! [section]
//! key = value
//! "key = with delimiter" = "  value with outer spaces  "
//! ```
//!
//! - Section names and keys are compared ASCII case-insensitively by
//!   [`IniDocument::get`] and [`IniDocument::set`].
//! - `;` and `#` start a comment **only** at the beginning of a line.  Values
//!   are never scanned for inline comments, because user-agent strings and
//!   URL fragments legitimately contain both characters.
//! - A value wrapped in double quotes has the outer pair stripped.
//! - A key may be wrapped in `"`, `` ` `` or ```` ``` ```` when it contains `=`
//!   or would otherwise be mistaken for a comment or section header.
//!   [`is_representable`] tells whether an entry survives a render/parse
//!   round trip at all.

use std::fmt;

use thiserror::Error;

/// Error type for INI parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IniError {
    /// A line starting with `[` has no closing `]`.
    #[error("line {line}: unterminated section header")]
    UnterminatedSection { line: usize },

    /// `[]` or `[   ]`.
    #[error("line {line}: empty section name")]
    EmptySectionName { line: usize },

    /// A non-comment, non-header line without `=`.
    #[error("line {line}: key-value delimiter not found")]
    MissingDelimiter { line: usize },

    /// `= value` or `"" = value`.
    #[error("line {line}: empty key name")]
    EmptyKey { line: usize },

    /// A quoted key whose closing quote is missing.
    #[error("line {line}: unterminated quoted key")]
    UnterminatedKey { line: usize },
}

// ── Document model ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Blank lines and comments, written back untouched.
    Verbatim(String),
    Entry(Entry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
    /// Source text of the line; `None` once modified or when created in memory.
    raw: Option<String>,
}

impl Entry {
    fn created(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        }
    }

    fn render(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        // Unrepresentable keys are filtered by callers via `is_representable`.
        let key = format_key(&self.key).unwrap_or_else(|| format!("`{}`", self.key));
        if self.value.is_empty() {
            format!("{key} =")
        } else {
            format!("{key} = {}", format_value(&self.value))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// `None` for the unnamed block of lines before the first header.
    name: Option<String>,
    raw_header: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    fn unnamed() -> Self {
        Self {
            name: None,
            raw_header: None,
            lines: Vec::new(),
        }
    }

    fn named(name: &str, raw_header: Option<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            raw_header,
            lines: Vec::new(),
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Verbatim(_) => None,
        })
    }

    fn ends_with_blank(&self) -> bool {
        matches!(self.lines.last(), Some(Line::Verbatim(raw)) if raw.trim().is_empty())
    }

    /// Index right after the last non-blank line, so new entries land above
    /// the blank separator that precedes the next section.
    fn insertion_point(&self) -> usize {
        self.lines
            .iter()
            .rposition(|line| !matches!(line, Line::Verbatim(raw) if raw.trim().is_empty()))
            .map_or(0, |idx| idx + 1)
    }

    fn insert_entry(&mut self, entry: Entry) {
        let at = self.insertion_point();
        self.lines.insert(at, Line::Entry(entry));
    }
}

/// A parsed INI file that remembers its original layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    /// Always starts with the unnamed section.
    sections: Vec<Section>,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::unnamed()],
        }
    }

    /// Parses INI text.
    ///
    /// Repeated section headers are merged into the first occurrence.  A key
    /// that appears twice in the same section keeps the position of its
    /// first occurrence and the value of its last.
    ///
    /// # Errors
    ///
    /// Returns [`IniError`] for malformed headers or entry lines.
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut doc = Self::new();
        let mut current = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                doc.sections[current]
                    .lines
                    .push(Line::Verbatim(raw.to_string()));
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = parse_section_name(header, line)?;
                current = match doc.position(name) {
                    Some(existing) => existing,
                    None => {
                        doc.sections
                            .push(Section::named(name, Some(raw.to_string())));
                        doc.sections.len() - 1
                    }
                };
                continue;
            }

            let (key, value) = parse_entry(trimmed, line)?;
            let section = &mut doc.sections[current];
            let duplicate = section.lines.iter_mut().find_map(|l| match l {
                Line::Entry(entry) if entry.key == key => Some(entry),
                _ => None,
            });
            match duplicate {
                Some(entry) => {
                    entry.value = value;
                    entry.raw = Some(raw.to_string());
                }
                None => section.lines.push(Line::Entry(Entry {
                    key,
                    value,
                    raw: Some(raw.to_string()),
                })),
            }
        }

        Ok(doc)
    }

    /// Returns `true` when a section with this name exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.position(section).is_some()
    }

    /// Looks up a key, ignoring ASCII case in both names.
    ///
    /// If several keys differ only by case, the last one wins.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.find(section)?
            .entries()
            .filter(|entry| entry.key.eq_ignore_ascii_case(key))
            .last()
            .map(|entry| entry.value.as_str())
    }

    /// Iterates a section's entries in file order, keys exactly as written.
    pub fn entries<'a>(&'a self, section: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.find(section)
            .into_iter()
            .flat_map(|s| s.entries())
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    /// Sets a key, creating the section if needed.
    ///
    /// An existing key (matched case-insensitively) is updated in place and
    /// keeps its spelling; otherwise the entry is appended to the section.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let idx = self.ensure_section(section);
        let existing = self.sections[idx]
            .lines
            .iter_mut()
            .rev()
            .find_map(|line| match line {
                Line::Entry(entry) if entry.key.eq_ignore_ascii_case(key) => Some(entry),
                _ => None,
            });

        match existing {
            Some(entry) => {
                if entry.value != value {
                    entry.value = value.to_string();
                    entry.raw = None;
                }
            }
            None => self.sections[idx].insert_entry(Entry::created(key, value)),
        }
    }

    /// Appends an entry without looking for an existing key.
    ///
    /// Intended for filling a freshly created section whose keys are already
    /// known to be distinct.
    pub fn append(&mut self, section: &str, key: &str, value: &str) {
        let idx = self.ensure_section(section);
        self.sections[idx].insert_entry(Entry::created(key, value));
    }

    /// Creates an empty section at the end of the document if it is missing.
    pub fn add_section(&mut self, section: &str) {
        self.ensure_section(section);
    }

    /// Removes a section and every line inside it.  Returns `false` when the
    /// section did not exist.
    pub fn remove_section(&mut self, section: &str) -> bool {
        match self.position(section) {
            Some(idx) => {
                self.sections.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns `true` when the document would render as an empty file.
    pub fn is_empty(&self) -> bool {
        self.sections.len() == 1 && self.sections[0].lines.is_empty()
    }

    fn position(&self, section: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.is_named(section))
    }

    fn find(&self, section: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_named(section))
    }

    fn ensure_section(&mut self, section: &str) -> usize {
        if let Some(idx) = self.position(section) {
            return idx;
        }
        if !self.is_empty() {
            if let Some(last) = self.sections.last_mut() {
                if !last.ends_with_blank() {
                    last.lines.push(Line::Verbatim(String::new()));
                }
            }
        }
        self.sections.push(Section::named(section, None));
        self.sections.len() - 1
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            match (&section.raw_header, &section.name) {
                (Some(raw), _) => writeln!(f, "{raw}")?,
                (None, Some(name)) => writeln!(f, "[{name}]")?,
                (None, None) => {}
            }
            for line in &section.lines {
                match line {
                    Line::Verbatim(raw) => writeln!(f, "{raw}")?,
                    Line::Entry(entry) => writeln!(f, "{}", entry.render())?,
                }
            }
        }
        Ok(())
    }
}

// ── Line-level helpers ────────────────────────────────────────────────────────

fn parse_section_name(header: &str, line: usize) -> Result<&str, IniError> {
    let end = header
        .find(']')
        .ok_or(IniError::UnterminatedSection { line })?;
    let name = header[..end].trim();
    if name.is_empty() {
        return Err(IniError::EmptySectionName { line });
    }
    Ok(name)
}

const TRIPLE_BACKTICK: &str = "```";

fn parse_entry(trimmed: &str, line: usize) -> Result<(String, String), IniError> {
    let quote = if trimmed.starts_with(TRIPLE_BACKTICK) {
        Some(TRIPLE_BACKTICK)
    } else if trimmed.starts_with('"') {
        Some("\"")
    } else if trimmed.starts_with('`') {
        Some("`")
    } else {
        None
    };

    let (key, rest) = match quote {
        Some(quote) => {
            let body = &trimmed[quote.len()..];
            let end = body
                .find(quote)
                .ok_or(IniError::UnterminatedKey { line })?;
            let rest = body[end + quote.len()..]
                .trim_start()
                .strip_prefix('=')
                .ok_or(IniError::MissingDelimiter { line })?;
            (&body[..end], rest)
        }
        _ => {
            let pos = trimmed
                .find('=')
                .ok_or(IniError::MissingDelimiter { line })?;
            (trimmed[..pos].trim_end(), &trimmed[pos + 1..])
        }
    };

    if key.is_empty() {
        return Err(IniError::EmptyKey { line });
    }
    Ok((key.to_string(), unquote_value(rest.trim())))
}

fn unquote_value(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// Returns `true` when `key = value` renders to a line that parses back to
/// exactly the same key and value.
///
/// Keys must be non-empty and single-line, and must fit one of the quoting
/// forms.  A key that contains `"` and `` ` `` and also needs quoting fits
/// only the triple-backtick form, which cannot hold ```` ``` ```` or a
/// trailing `` ` ``.
pub fn is_representable(key: &str, value: &str) -> bool {
    !value.contains(['\r', '\n']) && format_key(key).is_some()
}

fn format_key(key: &str) -> Option<String> {
    if key.is_empty() || key.contains(['\r', '\n']) {
        return None;
    }
    let needs_quotes = key.contains('=')
        || key.trim() != key
        || key.starts_with(|c: char| matches!(c, '"' | '`' | ';' | '#' | '['));
    if !needs_quotes {
        Some(key.to_string())
    } else if !key.contains('"') {
        Some(format!("\"{key}\""))
    } else if !key.contains('`') {
        Some(format!("`{key}`"))
    } else if !key.contains(TRIPLE_BACKTICK) && !key.ends_with('`') {
        Some(format!("{TRIPLE_BACKTICK}{key}{TRIPLE_BACKTICK}"))
    } else {
        None
    }
}

fn format_value(value: &str) -> String {
    if value.trim() != value || value.starts_with('"') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
