//! Skill loading
//!
//! Each skill is a folder containing SKILL.md with YAML frontmatter and an
//! optional `rules/` folder holding rule files and the `_sections.md` index.

use crate::frontmatter::{self, Document, Frontmatter};
use crate::patterns::Patterns;
use crate::schema::{self, DocumentKind};
use crate::sections::{self, SectionIndex, SECTIONS_FILE};
use skillaudit_types::{CorpusPath, Finding, RuleFile, RuleId, SkillManifest};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manifest file name inside a skill directory
pub const SKILL_FILE: &str = "SKILL.md";
/// Rules subdirectory inside a skill directory
pub const RULES_DIR: &str = "rules";

/// A loaded skill: manifest, declared sections and rule files
#[derive(Debug, Clone)]
pub struct Skill {
    /// Manifest built from SKILL.md
    pub manifest: SkillManifest,
    /// Declared sections; `None` when `rules/_sections.md` does not exist
    pub sections: Option<SectionIndex>,
    /// Rule files that parsed, sorted by path
    pub rules: Vec<RuleFile>,
}

impl Skill {
    /// Load the skill in `dir`, appending every problem found to `findings`.
    ///
    /// Returns `None` when SKILL.md cannot be read or its frontmatter is
    /// malformed; that failure is itself recorded as a finding. The rule files
    /// and section index are validated either way.
    pub fn load(
        root: &Path,
        dir: &Path,
        patterns: &Patterns,
        findings: &mut Vec<Finding>,
    ) -> Option<Self> {
        let rules_dir = dir.join(RULES_DIR);
        let (sections, rules) = if rules_dir.is_dir() {
            (
                load_sections(root, &rules_dir, patterns, findings),
                load_rules(root, &rules_dir, patterns, findings),
            )
        } else {
            (None, Vec::new())
        };

        let skill_file = dir.join(SKILL_FILE);
        let path = relative(root, &skill_file);

        let doc = read_document(&skill_file, &path, findings)?;

        findings.extend(
            schema::validate(&doc.frontmatter, DocumentKind::SkillManifest, patterns)
                .into_iter()
                .map(|v| v.into_finding(path.clone())),
        );
        findings.extend(schema::validate_troubleshooting(&path, &doc.body, patterns));

        let manifest = build_manifest(&doc.frontmatter, path);
        debug!("Loaded skill '{}' from {}", manifest.name, manifest.path);

        Some(Self {
            manifest,
            sections,
            rules,
        })
    }

    /// Get the skill name
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Location of the section index for this skill
    pub fn sections_path(&self) -> CorpusPath {
        self.manifest.dir().join(RULES_DIR).join(SECTIONS_FILE)
    }
}

/// Read and parse one markdown file, turning failures into findings
fn read_document(file: &Path, path: &CorpusPath, findings: &mut Vec<Finding>) -> Option<Document> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}", file, e);
            findings.push(Finding::error(
                path.clone(),
                RuleId::MalformedFrontmatter,
                format!("file could not be read: {e}"),
            ));
            return None;
        }
    };

    match frontmatter::parse(&content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            debug!("Skipping {}: {}", path, e);
            findings.push(Finding::error(
                path.clone(),
                RuleId::MalformedFrontmatter,
                e.to_string(),
            ));
            None
        }
    }
}

/// Best-effort manifest; fields that failed validation stay empty
fn build_manifest(fm: &Frontmatter, path: CorpusPath) -> SkillManifest {
    let mut manifest = SkillManifest::new(fm.text("name").unwrap_or_default(), path);
    manifest.description = fm.text("description").unwrap_or_default().to_string();
    manifest.category = fm.text("category").and_then(|s| s.parse().ok());
    manifest.status = fm.text("status").and_then(|s| s.parse().ok());
    manifest.tags = fm.string_set("tags").unwrap_or_default();
    manifest.version = fm
        .integer("version")
        .filter(|v| *v > 0)
        .and_then(|v| u64::try_from(v).ok());
    manifest.extends = fm.text("extends").map(str::to_string);
    manifest
}

fn build_rule(fm: &Frontmatter, path: CorpusPath) -> RuleFile {
    let mut rule = RuleFile::new(fm.text("title").unwrap_or_default(), path);
    rule.impact = fm.text("impact").and_then(|s| s.parse().ok());
    rule.impact_description = fm.text("impactDescription").map(str::to_string);
    rule.tags = fm.string_set("tags").unwrap_or_default();
    rule
}

fn load_sections(
    root: &Path,
    rules_dir: &Path,
    patterns: &Patterns,
    findings: &mut Vec<Finding>,
) -> Option<SectionIndex> {
    let file = rules_dir.join(SECTIONS_FILE);
    if !file.is_file() {
        return None;
    }
    let path = relative(root, &file);

    let content = match fs::read_to_string(&file) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}", file, e);
            findings.push(Finding::error(
                path,
                RuleId::SchemaViolation,
                format!("section index could not be read: {e}"),
            ));
            return Some(SectionIndex::default());
        }
    };

    let parsed = sections::parse(&content, patterns);
    findings.extend(
        parsed
            .problems
            .into_iter()
            .map(|problem| Finding::error(path.clone(), RuleId::SchemaViolation, problem)),
    );
    debug!("{} declares {} sections", path, parsed.index.sections().len());
    Some(parsed.index)
}

fn load_rules(
    root: &Path,
    rules_dir: &Path,
    patterns: &Patterns,
    findings: &mut Vec<Finding>,
) -> Vec<RuleFile> {
    let mut rules = Vec::new();

    let entries = WalkDir::new(rules_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", rules_dir, e);
                let path = e.path().unwrap_or(rules_dir);
                findings.push(Finding::error(
                    relative(root, path),
                    RuleId::UnreadablePath,
                    format!("could not be traversed: {e}"),
                ));
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy();
        if !entry.file_type().is_file() || !name.ends_with(".md") || name.starts_with('_') {
            continue;
        }

        let path = relative(root, entry.path());
        let Some(doc) = read_document(entry.path(), &path, findings) else {
            continue;
        };

        findings.extend(
            schema::validate(&doc.frontmatter, DocumentKind::RuleFile, patterns)
                .into_iter()
                .map(|v| v.into_finding(path.clone())),
        );
        findings.extend(schema::validate_rule_body(&path, &doc.body, patterns));

        rules.push(build_rule(&doc.frontmatter, path));
    }

    rules
}

/// Path of `path` relative to `root`, with `/` separators
pub(crate) fn relative(root: &Path, path: &Path) -> CorpusPath {
    let Ok(rel) = path.strip_prefix(root) else {
        // Outside the corpus (e.g. an explicit registry path)
        return CorpusPath::new(path.to_string_lossy());
    };
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    CorpusPath::new(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillaudit_types::{Impact, Status};
    use std::path::PathBuf;

    #[test]
    fn test_build_manifest_keeps_valid_fields() {
        let doc = frontmatter::parse(
            "---\nname: react\ndescription: d\ncategory: nope\nstatus: scaffold\ntags: a, b\nversion: 4\nextends: base\n---\n",
        )
        .unwrap();
        let manifest = build_manifest(&doc.frontmatter, CorpusPath::new("react/SKILL.md"));
        assert_eq!(manifest.name, "react");
        assert_eq!(manifest.category, None);
        assert_eq!(manifest.status, Some(Status::Scaffold));
        assert_eq!(manifest.version, Some(4));
        assert_eq!(manifest.extends.as_deref(), Some("base"));
        assert_eq!(manifest.tags.len(), 2);
    }

    #[test]
    fn test_build_manifest_drops_non_positive_version() {
        let doc = frontmatter::parse("---\nname: x\nversion: -1\n---\n").unwrap();
        let manifest = build_manifest(&doc.frontmatter, CorpusPath::new("x/SKILL.md"));
        assert_eq!(manifest.version, None);
    }

    #[test]
    fn test_build_rule() {
        let doc = frontmatter::parse(
            "---\ntitle: Defer await\nimpact: high\nimpactDescription: avoids blocking\ntags: [async]\n---\n",
        )
        .unwrap();
        let rule = build_rule(&doc.frontmatter, CorpusPath::new("r/rules/async-defer-await.md"));
        assert_eq!(rule.title, "Defer await");
        assert_eq!(rule.impact, Some(Impact::High));
        assert_eq!(rule.impact_description.as_deref(), Some("avoids blocking"));
    }

    #[test]
    fn test_relative_path() {
        let root = PathBuf::from("/corpus");
        let path = root.join("skills").join("react").join("SKILL.md");
        assert_eq!(relative(&root, &path).as_str(), "skills/react/SKILL.md");
    }
}
