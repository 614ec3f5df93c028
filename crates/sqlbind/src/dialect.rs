//! Placeholder styles.
//!
//! A dialect decides only how a placeholder is written and whether parameters
//! are addressed by name. Fragment semantics are dialect-independent.
//!
//! | Dialect      | Mark          | Typical backend            |
//! |--------------|---------------|----------------------------|
//! | [`QMark`]    | `?`           | SQLite                     |
//! | [`Numbered`] | `$1, $2, ...` | PostgreSQL                 |
//! | [`Format`]   | `%s`          | MySQL, psycopg             |
//! | [`Named`]    | `:p1, :p2`    | SQLite / Oracle named args |
//!
//! [`DialectKind`] selects one of these from configuration.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Placeholder emission policy used by the renderer.
pub trait Dialect {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Write the placeholder for the parameter at `index` (0-based).
    fn write_mark(&self, out: &mut String, index: usize);

    /// Name under which the parameter at `index` is bound, for named dialects.
    fn param_name(&self, _index: usize) -> Option<String> {
        None
    }
}

/// `?` placeholders, consumed positionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QMark;

impl Dialect for QMark {
    fn name(&self) -> &'static str {
        "qmark"
    }

    fn write_mark(&self, out: &mut String, _index: usize) {
        out.push('?');
    }
}

/// `$1, $2, ...` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Numbered;

impl Dialect for Numbered {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn write_mark(&self, out: &mut String, index: usize) {
        out.push('$');
        push_usize(out, index + 1);
    }
}

/// `%s` placeholders, consumed positionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Format;

impl Dialect for Format {
    fn name(&self) -> &'static str {
        "format"
    }

    fn write_mark(&self, out: &mut String, _index: usize) {
        out.push_str("%s");
    }
}

/// Named placeholders: `{prefix}{stem}{n}`, `:p1` by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Named {
    prefix: char,
    stem: String,
}

impl Default for Named {
    fn default() -> Self {
        Self {
            prefix: ':',
            stem: "p".to_string(),
        }
    }
}

impl Named {
    /// Create a named dialect with defaults (`:p1`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the marker character (`:`, `@`, `$`...).
    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    /// Override the name stem (`p` in `:p1`).
    pub fn stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }
}

impl Dialect for Named {
    fn name(&self) -> &'static str {
        "named"
    }

    fn write_mark(&self, out: &mut String, index: usize) {
        out.push(self.prefix);
        out.push_str(&self.stem);
        push_usize(out, index + 1);
    }

    fn param_name(&self, index: usize) -> Option<String> {
        Some(format!("{}{}", self.stem, index + 1))
    }
}

/// Configuration-level dialect selection.
///
/// Deserializes from `"qmark"`, `"numbered"`, `"format"` or
/// `{ "named": { "prefix": "@", "stem": "v" } }`, and parses from the same
/// names (plus `sqlite`, `postgres`, `mysql` aliases) via [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[default]
    #[serde(alias = "sqlite")]
    Qmark,
    #[serde(alias = "postgres")]
    Numbered,
    #[serde(alias = "mysql")]
    Format,
    Named(Named),
}

impl Dialect for DialectKind {
    fn name(&self) -> &'static str {
        match self {
            DialectKind::Qmark => QMark.name(),
            DialectKind::Numbered => Numbered.name(),
            DialectKind::Format => Format.name(),
            DialectKind::Named(d) => d.name(),
        }
    }

    fn write_mark(&self, out: &mut String, index: usize) {
        match self {
            DialectKind::Qmark => QMark.write_mark(out, index),
            DialectKind::Numbered => Numbered.write_mark(out, index),
            DialectKind::Format => Format.write_mark(out, index),
            DialectKind::Named(d) => d.write_mark(out, index),
        }
    }

    fn param_name(&self, index: usize) -> Option<String> {
        match self {
            DialectKind::Named(d) => d.param_name(index),
            _ => None,
        }
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown SQL dialect '{0}'")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qmark" | "sqlite" => Ok(DialectKind::Qmark),
            "numbered" | "postgres" | "postgresql" => Ok(DialectKind::Numbered),
            "format" | "mysql" => Ok(DialectKind::Format),
            "named" => Ok(DialectKind::Named(Named::default())),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

// Placeholders are written on every value node, so skip `fmt` machinery for
// the common small indices.
#[inline]
fn push_usize(out: &mut String, n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
    } else {
        let _ = write!(out, "{n}");
    }
}
