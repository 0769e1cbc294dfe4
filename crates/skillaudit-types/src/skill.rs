use crate::{parse_closed, ClosedEnum, CorpusPath, ParseEnumError};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Skill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Universal,
    Platform,
    Framework,
    Design,
    Agent,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Universal => "universal",
            Category::Platform => "platform",
            Category::Framework => "framework",
            Category::Design => "design",
            Category::Agent => "agent",
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(
            s,
            &[
                ("universal", Category::Universal),
                ("platform", Category::Platform),
                ("framework", Category::Framework),
                ("design", Category::Design),
                ("agent", Category::Agent),
            ],
            Self::EXPECTED,
        )
    }
}

impl ClosedEnum for Category {
    const EXPECTED: &'static str = "universal, platform, framework, design, agent";
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoring status of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ready,
    Scaffold,
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(
            s,
            &[("ready", Status::Ready), ("scaffold", Status::Scaffold)],
            Self::EXPECTED,
        )
    }
}

impl ClosedEnum for Status {
    const EXPECTED: &'static str = "ready, scaffold";
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("ready"),
            Status::Scaffold => f.write_str("scaffold"),
        }
    }
}

/// Identity record of one skill, read from its SKILL.md frontmatter.
///
/// Fields that failed validation are `None`; the violation is reported
/// separately so cross-reference checks can still run on the rest.
#[derive(Debug, Clone)]
pub struct SkillManifest {
    pub name: String,
    pub description: String,
    pub category: Option<Category>,
    pub tags: BTreeSet<String>,
    pub status: Option<Status>,
    pub version: Option<u64>,
    pub extends: Option<String>,
    /// Location of the SKILL.md file
    pub path: CorpusPath,
}

impl SkillManifest {
    pub fn new(name: impl Into<String>, path: CorpusPath) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: None,
            tags: BTreeSet::new(),
            status: None,
            version: None,
            extends: None,
            path,
        }
    }

    /// Directory holding the manifest
    pub fn dir(&self) -> CorpusPath {
        self.path.parent()
    }

    /// Name of the directory holding the manifest
    pub fn dir_name(&self) -> String {
        self.dir().file_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Framework".parse::<Category>(), Ok(Category::Framework));
        assert_eq!(" agent ".parse::<Category>(), Ok(Category::Agent));
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        let err = "library".parse::<Category>().unwrap_err();
        assert_eq!(err.value, "library");
        assert!(err.to_string().contains("universal"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("scaffold".parse::<Status>(), Ok(Status::Scaffold));
        assert!("draft".parse::<Status>().is_err());
    }

    #[test]
    fn test_manifest_dir_name() {
        let manifest = SkillManifest::new("agents-md", CorpusPath::new("skills/agents-md/SKILL.md"));
        assert_eq!(manifest.dir().as_str(), "skills/agents-md");
        assert_eq!(manifest.dir_name(), "agents-md");
    }
}
