//! Regular expressions shared by the validators, compiled once per run

use regex::Regex;

/// Compiled patterns used by schema, body and section checks
#[derive(Debug, Clone)]
pub struct Patterns {
    pub(crate) kebab_name: Regex,
    pub(crate) trigger_phrase: Regex,
    pub(crate) incorrect_marker: Regex,
    pub(crate) correct_marker: Regex,
    pub(crate) why_marker: Regex,
    pub(crate) section_heading: Regex,
    pub(crate) section_field: Regex,
    pub(crate) troubleshooting_heading: Regex,
}

impl Patterns {
    /// Compile all patterns
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            kebab_name: Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$")?,
            trigger_phrase: Regex::new(
                r"(?i)\b(use\s+(this|it|when|for)|when\s+(the\s+)?user|trigger(s|ed)?)\b",
            )?,
            incorrect_marker: Regex::new(r"(?i)\bincorrect\b")?,
            correct_marker: Regex::new(r"(?i)\bcorrect\b")?,
            why_marker: Regex::new(r"(?i)\bwhy\s+it\s+matters\b")?,
            section_heading: Regex::new(r"^##\s+(\d+)\.\s+(.+?)\s*\(([A-Za-z0-9_-]+)\)\s*$")?,
            section_field: Regex::new(r"^\*\*(Impact|Description):\*\*\s*(.*?)\s*$")?,
            troubleshooting_heading: Regex::new(r"(?i)^(#{1,6})\s+troubleshooting\b")?,
        })
    }
}
