//! Schema validation for skill manifests and rule files
//!
//! Validation never fails: every problem with a document is collected so a
//! single pass reports everything wrong with it.

use crate::frontmatter::{FieldValue, Frontmatter};
use crate::patterns::Patterns;
use skillaudit_types::{
    Category, ClosedEnum, CorpusPath, Finding, Impact, RuleId, Severity, Status,
};

/// Maximum name length hosts accept
const MAX_NAME_LENGTH: usize = 64;
/// Maximum description length hosts accept
const MAX_DESCRIPTION_LENGTH: usize = 1024;

const MANIFEST_FIELDS: &[&str] = &[
    "name",
    "description",
    "category",
    "tags",
    "status",
    "version",
    "extends",
];

/// Keys read by agent hosts rather than by this repository; accepted as-is
const MANIFEST_PASSTHROUGH_FIELDS: &[&str] = &[
    "license",
    "metadata",
    "allowed-tools",
    "argument-hint",
    "model",
    "user-invocable",
    "disable-model-invocation",
    "compatibility",
];

const RULE_FIELDS: &[&str] = &["title", "impact", "impactDescription", "tags"];

/// Which schema a document is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A skill's `SKILL.md`
    SkillManifest,
    /// A file under a skill's `rules/` directory
    RuleFile,
}

impl DocumentKind {
    fn accepts(&self, key: &str) -> bool {
        match self {
            DocumentKind::SkillManifest => {
                MANIFEST_FIELDS.contains(&key) || MANIFEST_PASSTHROUGH_FIELDS.contains(&key)
            }
            DocumentKind::RuleFile => RULE_FIELDS.contains(&key),
        }
    }
}

/// One problem with one frontmatter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Offending key
    pub field: String,
    /// What is wrong with it
    pub reason: String,
    /// Check that raised it
    pub rule: RuleId,
    /// Error or warning
    pub severity: Severity,
}

impl SchemaViolation {
    fn error(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
            rule: RuleId::SchemaViolation,
            severity: Severity::Error,
        }
    }

    fn warning(field: &str, reason: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(field, reason)
        }
    }

    fn unknown_field(field: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: "is not a recognised field".to_string(),
            rule: RuleId::UnknownField,
            severity: Severity::Warning,
        }
    }

    /// Attach the violation to a file
    pub fn into_finding(self, path: CorpusPath) -> Finding {
        let message = format!("field '{}' {}", self.field, self.reason);
        match self.severity {
            Severity::Error => Finding::error(path, self.rule, message),
            Severity::Warning => Finding::warning(path, self.rule, message),
        }
    }
}

/// Validate parsed frontmatter against the schema for `kind`
pub fn validate(
    frontmatter: &Frontmatter,
    kind: DocumentKind,
    patterns: &Patterns,
) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    match kind {
        DocumentKind::SkillManifest => validate_manifest(frontmatter, patterns, &mut violations),
        DocumentKind::RuleFile => validate_rule(frontmatter, &mut violations),
    }

    for key in frontmatter.keys() {
        if !kind.accepts(key) {
            violations.push(SchemaViolation::unknown_field(key));
        }
    }

    violations
}

fn validate_manifest(fm: &Frontmatter, patterns: &Patterns, out: &mut Vec<SchemaViolation>) {
    if let Some(name) = required_text(fm, "name", out) {
        if !patterns.kebab_name.is_match(name) {
            out.push(SchemaViolation::error(
                "name",
                format!("'{name}' must contain only lowercase letters, numbers, and single hyphens"),
            ));
        }
        if name.len() > MAX_NAME_LENGTH {
            out.push(SchemaViolation::warning(
                "name",
                format!("exceeds {MAX_NAME_LENGTH} characters (was {})", name.len()),
            ));
        }
    }

    if let Some(description) = required_text(fm, "description", out) {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            out.push(SchemaViolation::warning(
                "description",
                format!(
                    "exceeds {MAX_DESCRIPTION_LENGTH} characters (was {})",
                    description.len()
                ),
            ));
        }
        if !patterns.trigger_phrase.is_match(description) {
            out.push(SchemaViolation::warning(
                "description",
                "should say when to use the skill (e.g. \"Use when ...\")",
            ));
        }
    }

    required_enum::<Category>(fm, "category", out);
    required_enum::<Status>(fm, "status", out);

    if let Some(value) = present(fm, "tags") {
        if fm.string_set("tags").is_none() {
            out.push(SchemaViolation::error(
                "tags",
                format!("must be a list or comma separated string, found {}", value.kind()),
            ));
        }
    }

    match present(fm, "version") {
        Some(FieldValue::Integer(v)) if *v <= 0 => {
            out.push(SchemaViolation::error(
                "version",
                format!("must be a positive integer, found {v}"),
            ));
        }
        // Parser already rejected non-integers
        _ => {}
    }

    if let Some(value) = present(fm, "extends") {
        if fm.text("extends").is_none() {
            out.push(SchemaViolation::error(
                "extends",
                format!("must name another skill, found {}", value.kind()),
            ));
        }
    }
}

fn validate_rule(fm: &Frontmatter, out: &mut Vec<SchemaViolation>) {
    required_text(fm, "title", out);
    required_enum::<Impact>(fm, "impact", out);

    match present(fm, "tags") {
        None => out.push(SchemaViolation::error("tags", "is required")),
        Some(value) => match fm.string_set("tags") {
            None => out.push(SchemaViolation::error(
                "tags",
                format!("must be a list or comma separated string, found {}", value.kind()),
            )),
            Some(tags) if tags.is_empty() => {
                out.push(SchemaViolation::error("tags", "must not be empty"))
            }
            Some(_) => {}
        },
    }

    if let Some(value) = present(fm, "impactDescription") {
        if fm.text("impactDescription").is_none() {
            out.push(SchemaViolation::error(
                "impactDescription",
                format!("must be a string, found {}", value.kind()),
            ));
        }
    }
}

/// Value for `key` unless it is absent or null
fn present<'a>(fm: &'a Frontmatter, key: &str) -> Option<&'a FieldValue> {
    match fm.get(key) {
        None | Some(FieldValue::Null) => None,
        Some(value) => Some(value),
    }
}

fn required_text<'a>(
    fm: &'a Frontmatter,
    key: &str,
    out: &mut Vec<SchemaViolation>,
) -> Option<&'a str> {
    match present(fm, key) {
        None => {
            out.push(SchemaViolation::error(key, "is required"));
            None
        }
        Some(value) => {
            let text = fm.text(key);
            if text.is_none() {
                let found = match value {
                    FieldValue::Text(_) => "blank string",
                    other => other.kind(),
                };
                out.push(SchemaViolation::error(
                    key,
                    format!("must be a non-empty string, found {found}"),
                ));
            }
            text
        }
    }
}

fn required_enum<T: ClosedEnum>(fm: &Frontmatter, key: &str, out: &mut Vec<SchemaViolation>) {
    match present(fm, key) {
        None => out.push(SchemaViolation::error(key, "is required")),
        Some(FieldValue::Text(s)) => {
            if s.parse::<T>().is_err() {
                out.push(SchemaViolation::error(
                    key,
                    format!("must be one of {}, found '{}'", T::EXPECTED, s.trim()),
                ));
            }
        }
        Some(other) => out.push(SchemaViolation::error(
            key,
            format!("must be one of {}, found {}", T::EXPECTED, other.kind()),
        )),
    }
}

/// Check a rule body for its Incorrect / Correct / Why it matters parts
pub fn validate_rule_body(path: &CorpusPath, body: &str, patterns: &Patterns) -> Vec<Finding> {
    let required = [
        (&patterns.incorrect_marker, "an \"Incorrect\" example"),
        (&patterns.correct_marker, "a \"Correct\" example"),
        (&patterns.why_marker, "a \"Why it matters\" explanation"),
    ];

    required
        .iter()
        .filter(|(pattern, _)| !pattern.is_match(body))
        .map(|(_, what)| {
            Finding::warning(path.clone(), RuleId::RuleBody, format!("body is missing {what}"))
        })
        .collect()
}

/// Check that troubleshooting sections use literal `- Error:` / `- Cause:` / `- Solution:` entries
pub fn validate_troubleshooting(path: &CorpusPath, body: &str, patterns: &Patterns) -> Vec<Finding> {
    let mut findings = Vec::new();
    // Code fences are opaque: `# comment` inside a bash block is not a heading
    let mut lines = outside_fences(body).peekable();

    while let Some(line) = lines.next() {
        let Some(line) = line else {
            continue;
        };
        let Some(caps) = patterns.troubleshooting_heading.captures(line) else {
            continue;
        };
        let level = caps.get(1).map_or(2, |m| m.as_str().len());

        let (mut errors, mut causes, mut solutions) = (0usize, 0usize, 0usize);
        while let Some(next) = lines.peek() {
            let Some(next) = *next else {
                lines.next();
                continue;
            };
            if heading_level(next).is_some_and(|l| l <= level) {
                break;
            }
            let entry = next.trim_start();
            if entry.starts_with("- Error:") {
                errors += 1;
            } else if entry.starts_with("- Cause:") {
                causes += 1;
            } else if entry.starts_with("- Solution:") {
                solutions += 1;
            }
            lines.next();
        }

        if errors == 0 {
            findings.push(Finding::warning(
                path.clone(),
                RuleId::TroubleshootingFormat,
                "troubleshooting section has no '- Error:' entries",
            ));
        } else if errors != causes || errors != solutions {
            findings.push(Finding::warning(
                path.clone(),
                RuleId::TroubleshootingFormat,
                format!(
                    "troubleshooting entries are unbalanced: {errors} Error, {causes} Cause, {solutions} Solution"
                ),
            ));
        }
    }

    findings
}

/// Body lines, with `None` standing in for fence delimiters and fenced content
fn outside_fences(body: &str) -> impl Iterator<Item = Option<&str>> {
    let mut fence: Option<&str> = None;
    body.lines().map(move |line| {
        let trimmed = line.trim_start();
        let marker = ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m));
        match (fence, marker) {
            (None, Some(marker)) => {
                fence = Some(marker);
                None
            }
            (Some(open), Some(marker)) if open == marker => {
                fence = None;
                None
            }
            (Some(_), _) => None,
            (None, None) => Some(line),
        }
    })
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    let rest = &line[hashes..];
    (hashes > 0 && (rest.is_empty() || rest.starts_with(' '))).then_some(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter;

    fn check(content: &str, kind: DocumentKind) -> Vec<SchemaViolation> {
        let patterns = Patterns::compile().unwrap();
        let doc = frontmatter::parse(content).unwrap();
        validate(&doc.frontmatter, kind, &patterns)
    }

    const VALID_MANIFEST: &str = "---
name: agents-md
description: Writes AGENTS.md files. Use when setting up a repository for coding agents.
category: universal
tags: [docs, agents]
status: ready
version: 1
---
";

    #[test]
    fn test_valid_manifest() {
        assert!(check(VALID_MANIFEST, DocumentKind::SkillManifest).is_empty());
    }

    #[test]
    fn test_missing_category_is_single_violation() {
        let content = VALID_MANIFEST.replace("category: universal\n", "");
        let violations = check(&content, DocumentKind::SkillManifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "category");
        assert_eq!(violations[0].rule, RuleId::SchemaViolation);
        assert_eq!(violations[0].reason, "is required");
    }

    #[test]
    fn test_invalid_enums() {
        let content = VALID_MANIFEST
            .replace("category: universal", "category: library")
            .replace("status: ready", "status: [ready]");
        let violations = check(&content, DocumentKind::SkillManifest);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["category", "status"]);
        assert!(violations[0].reason.contains("found 'library'"));
        assert!(violations[1].reason.contains("found list"));
    }

    #[test]
    fn test_invalid_name() {
        let content = VALID_MANIFEST.replace("name: agents-md", "name: Agents_MD");
        let violations = check(&content, DocumentKind::SkillManifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_description_without_trigger_is_warning() {
        let content = VALID_MANIFEST.replace(
            "Use when setting up a repository for coding agents.",
            "Guidance for AGENTS.md.",
        );
        let violations = check(&content, DocumentKind::SkillManifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
    }

    #[test]
    fn test_non_positive_version() {
        let content = VALID_MANIFEST.replace("version: 1", "version: 0");
        let violations = check(&content, DocumentKind::SkillManifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "version");
    }

    #[test]
    fn test_unknown_and_passthrough_fields() {
        let content = VALID_MANIFEST.replace(
            "version: 1\n",
            "version: 1\nlicense: MIT\nmetadata:\n  author: x\nauthor: someone\n",
        );
        let violations = check(&content, DocumentKind::SkillManifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleId::UnknownField);
        assert_eq!(violations[0].field, "author");
    }

    #[test]
    fn test_rule_file_schema() {
        let valid = "---\ntitle: Parallel fetches\nimpact: CRITICAL\nimpactDescription: 2-10x faster\ntags: async, promises\n---\n";
        assert!(check(valid, DocumentKind::RuleFile).is_empty());

        let invalid = "---\nimpact: SEVERE\ntags: []\n---\n";
        let violations = check(invalid, DocumentKind::RuleFile);
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "impact", "tags"]);
        assert_eq!(violations[2].reason, "must not be empty");
    }

    #[test]
    fn test_rule_body_markers() {
        let patterns = Patterns::compile().unwrap();
        let path = CorpusPath::new("r/rules/async-a.md");
        let complete = "**Incorrect:**\n```js\n```\n**Correct:**\n```js\n```\nWhy it matters: waterfalls.";
        assert!(validate_rule_body(&path, complete, &patterns).is_empty());

        let only_incorrect = "**Incorrect:**\n```js\n```\n";
        let findings = validate_rule_body(&path, only_incorrect, &patterns);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("Correct"));
        assert!(findings.iter().all(|f| f.rule == RuleId::RuleBody));
    }

    #[test]
    fn test_troubleshooting_format() {
        let patterns = Patterns::compile().unwrap();
        let path = CorpusPath::new("s/SKILL.md");

        let good = "# Skill\n\n## Troubleshooting\n\n- Error: build fails\n- Cause: stale cache\n- Solution: clear it\n\n## Next\n- Error: not counted\n";
        assert!(validate_troubleshooting(&path, good, &patterns).is_empty());

        let unbalanced = "## Troubleshooting\n\n### Build\n- Error: x\n- Cause: y\n";
        let findings = validate_troubleshooting(&path, unbalanced, &patterns);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("1 Error, 1 Cause, 0 Solution"));

        let prose = "## Troubleshooting\n\nIf it breaks, retry.\n";
        assert_eq!(validate_troubleshooting(&path, prose, &patterns).len(), 1);

        assert!(validate_troubleshooting(&path, "## Usage\n", &patterns).is_empty());

        let fenced = "## Troubleshooting\n```bash\n# reinstall\nnpm ci\n```\n- Error: x\n- Cause: y\n- Solution: z\n";
        assert!(validate_troubleshooting(&path, fenced, &patterns).is_empty());

        let heading_in_fence = "## Setup\n~~~md\n## Troubleshooting\n~~~\n";
        assert!(validate_troubleshooting(&path, heading_in_fence, &patterns).is_empty());
    }
}
