use crate::CorpusPath;
use serde::Serialize;
use std::fmt;

/// Stable identifier of the check that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// Frontmatter block missing, unterminated or not valid YAML
    MalformedFrontmatter,
    /// Required field missing or holding an invalid value
    SchemaViolation,
    /// Manifest version disagrees with the registry
    VersionMismatch,
    /// Rule filename prefix has no declared section
    UnknownSection,
    /// `extends` names a skill that does not exist
    DanglingExtends,
    /// Two manifests declare the same name
    DuplicateSkillName,
    /// Frontmatter key outside the recognised schema
    UnknownField,
    /// Rule body lacks the Incorrect / Correct / Why it matters parts
    RuleBody,
    /// Troubleshooting entries not written as Error / Cause / Solution triples
    TroubleshootingFormat,
    /// Manifest name differs from its directory name
    NameDirectoryMismatch,
    /// Registry lists a skill that has no manifest
    OrphanRegistryEntry,
    /// Registry metadata disagrees with the manifest
    RegistryDrift,
    /// Part of the tree could not be traversed
    UnreadablePath,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::MalformedFrontmatter => "malformed-frontmatter",
            RuleId::SchemaViolation => "schema-violation",
            RuleId::VersionMismatch => "version-mismatch",
            RuleId::UnknownSection => "unknown-section",
            RuleId::DanglingExtends => "dangling-extends",
            RuleId::DuplicateSkillName => "duplicate-skill-name",
            RuleId::UnknownField => "unknown-field",
            RuleId::RuleBody => "rule-body",
            RuleId::TroubleshootingFormat => "troubleshooting-format",
            RuleId::NameDirectoryMismatch => "name-directory-mismatch",
            RuleId::OrphanRegistryEntry => "orphan-registry-entry",
            RuleId::RegistryDrift => "registry-drift",
            RuleId::UnreadablePath => "unreadable-path",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finding affects the exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One violation reported against one file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Finding {
    pub path: CorpusPath,
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(path: CorpusPath, rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            path,
            rule,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(path: CorpusPath, rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            path,
            rule,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    /// `<file>: <rule-id>: <message>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "{}: {}: {}", self.path, self.rule, self.message),
            Severity::Warning => write!(
                f,
                "{}: {}: warning: {}",
                self.path, self.rule, self.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_display() {
        let finding = Finding::error(
            CorpusPath::new("skills/react/SKILL.md"),
            RuleId::VersionMismatch,
            "version 2 has no registry entry",
        );
        assert_eq!(
            finding.to_string(),
            "skills/react/SKILL.md: version-mismatch: version 2 has no registry entry"
        );
    }

    #[test]
    fn test_warning_display() {
        let finding = Finding::warning(
            CorpusPath::new("react/rules/async-a.md"),
            RuleId::RuleBody,
            "missing \"Why it matters\"",
        );
        assert!(!finding.is_error());
        assert_eq!(
            finding.to_string(),
            "react/rules/async-a.md: rule-body: warning: missing \"Why it matters\""
        );
    }

    #[test]
    fn test_findings_sort_by_path_first() {
        let mut findings = vec![
            Finding::error(CorpusPath::new("b/SKILL.md"), RuleId::SchemaViolation, "x"),
            Finding::error(CorpusPath::new("a/SKILL.md"), RuleId::DanglingExtends, "y"),
            Finding::error(CorpusPath::new("a/SKILL.md"), RuleId::SchemaViolation, "z"),
        ];
        findings.sort();
        assert_eq!(findings[0].path.as_str(), "a/SKILL.md");
        assert_eq!(findings[0].rule, RuleId::SchemaViolation);
        assert_eq!(findings[2].path.as_str(), "b/SKILL.md");
    }
}
