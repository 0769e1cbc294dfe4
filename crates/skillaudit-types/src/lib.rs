//! skillaudit Types - Core types for the skills auditor
//!
//! This module defines the data model shared by the checker and the CLI:
//! skill manifests, rule files, sections, registry entries and findings.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod finding;
pub mod registry;
pub mod rule;
pub mod skill;

pub use finding::{Finding, RuleId, Severity};
pub use registry::RegistryEntry;
pub use rule::{Impact, RuleFile, Section};
pub use skill::{Category, SkillManifest, Status};

/// A closed-enum value that did not match any accepted variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not one of: {expected}")]
pub struct ParseEnumError {
    /// The rejected input
    pub value: String,
    /// Comma separated list of accepted values
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

/// Path of a file inside the corpus, relative to the audited root.
///
/// Always uses `/` separators so reports are stable across platforms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CorpusPath(String);

impl CorpusPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent directory, or the empty path for top-level files
    pub fn parent(&self) -> CorpusPath {
        match self.0.rfind('/') {
            Some(idx) => CorpusPath(self.0[..idx].to_string()),
            None => CorpusPath(String::new()),
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Join a relative component onto this path
    pub fn join(&self, component: &str) -> CorpusPath {
        if self.0.is_empty() {
            CorpusPath::new(component)
        } else {
            CorpusPath::new(format!("{}/{}", self.0, component))
        }
    }
}

impl fmt::Display for CorpusPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(".")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for CorpusPath {
    fn from(value: &str) -> Self {
        CorpusPath::new(value)
    }
}

/// Shared helper for the closed enums: case-insensitive match against `(text, value)` pairs
pub(crate) fn parse_closed<T: Copy>(
    input: &str,
    variants: &[(&str, T)],
    expected: &'static str,
) -> Result<T, ParseEnumError> {
    let needle = input.trim();
    variants
        .iter()
        .find(|(text, _)| text.eq_ignore_ascii_case(needle))
        .map(|(_, value)| *value)
        .ok_or_else(|| ParseEnumError::new(input, expected))
}

/// Marker so the closed enums can be parsed generically
pub trait ClosedEnum: FromStr<Err = ParseEnumError> + fmt::Display {
    /// Human readable list of accepted values
    const EXPECTED: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_path_components() {
        let path = CorpusPath::new("skills\\react\\SKILL.md");
        assert_eq!(path.as_str(), "skills/react/SKILL.md");
        assert_eq!(path.file_name(), "SKILL.md");
        assert_eq!(path.parent().as_str(), "skills/react");
        assert_eq!(path.parent().join("rules").as_str(), "skills/react/rules");
    }

    #[test]
    fn test_corpus_path_root_display() {
        let root = CorpusPath::new("SKILL.md").parent();
        assert_eq!(root.to_string(), ".");
        assert_eq!(root.join("SKILL.md").as_str(), "SKILL.md");
    }
}
