use crate::{parse_closed, ClosedEnum, CorpusPath, ParseEnumError};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Impact level of a rule or section, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    Critical,
    High,
    MediumHigh,
    Medium,
    LowMedium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "CRITICAL",
            Impact::High => "HIGH",
            Impact::MediumHigh => "MEDIUM-HIGH",
            Impact::Medium => "MEDIUM",
            Impact::LowMedium => "LOW-MEDIUM",
            Impact::Low => "LOW",
        }
    }
}

impl FromStr for Impact {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(
            s,
            &[
                ("CRITICAL", Impact::Critical),
                ("HIGH", Impact::High),
                ("MEDIUM-HIGH", Impact::MediumHigh),
                ("MEDIUM", Impact::Medium),
                ("LOW-MEDIUM", Impact::LowMedium),
                ("LOW", Impact::Low),
            ],
            Self::EXPECTED,
        )
    }
}

impl ClosedEnum for Impact {
    const EXPECTED: &'static str = "CRITICAL, HIGH, MEDIUM-HIGH, MEDIUM, LOW-MEDIUM, LOW";
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One behavioral rule file under a skill's `rules/` directory
#[derive(Debug, Clone)]
pub struct RuleFile {
    pub title: String,
    pub impact: Option<Impact>,
    /// Free text from the `impactDescription` key
    pub impact_description: Option<String>,
    pub tags: BTreeSet<String>,
    pub path: CorpusPath,
}

impl RuleFile {
    pub fn new(title: impl Into<String>, path: CorpusPath) -> Self {
        Self {
            title: title.into(),
            impact: None,
            impact_description: None,
            tags: BTreeSet::new(),
            path,
        }
    }

    /// File name without the `.md` extension
    pub fn stem(&self) -> &str {
        let name = self.path.file_name();
        name.strip_suffix(".md").unwrap_or(name)
    }

    /// Prefix up to the first `-`, used when no declared section matches
    pub fn naive_prefix(&self) -> &str {
        let stem = self.stem();
        stem.split('-').next().unwrap_or(stem)
    }

    /// Whether this rule's file name falls under the section `id`
    pub fn belongs_to(&self, id: &str) -> bool {
        let stem = self.stem();
        stem == id
            || stem
                .strip_prefix(id)
                .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Named, ordered grouping of rules declared in `rules/_sections.md`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Filename prefix shared by the section's rules
    pub id: String,
    pub title: String,
    pub impact: Option<Impact>,
    pub description: String,
    /// 1-based position as declared
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_parse() {
        assert_eq!("medium-high".parse::<Impact>(), Ok(Impact::MediumHigh));
        assert_eq!("CRITICAL".parse::<Impact>(), Ok(Impact::Critical));
        assert!("SEVERE".parse::<Impact>().is_err());
    }

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::Critical < Impact::High);
        assert!(Impact::MediumHigh < Impact::Medium);
        assert!(Impact::LowMedium < Impact::Low);
    }

    #[test]
    fn test_rule_prefix_matching() {
        let rule = RuleFile::new("Parallel fetches", CorpusPath::new("react/rules/async-parallel.md"));
        assert_eq!(rule.stem(), "async-parallel");
        assert_eq!(rule.naive_prefix(), "async");
        assert!(rule.belongs_to("async"));
        assert!(rule.belongs_to("async-parallel"));
        assert!(!rule.belongs_to("asy"));
        assert!(!rule.belongs_to("bundle"));
    }
}
