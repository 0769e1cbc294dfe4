//! Corpus discovery
//!
//! Walks the skills tree once and loads every skill it finds into an
//! immutable snapshot. Per-file failures are recorded as findings; only a
//! missing root aborts discovery.

use crate::error::{AuditError, Result};
use crate::patterns::Patterns;
use crate::skill::{relative, Skill, SKILL_FILE};
use skillaudit_types::{Finding, RuleId};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory names skipped during discovery unless configured otherwise
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "target"];

/// Snapshot of every skill under a root
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    skills: Vec<Skill>,
    findings: Vec<Finding>,
}

impl Corpus {
    /// Scan `root` and load every skill (any directory holding a SKILL.md).
    ///
    /// Hidden entries below the root and directories whose name is in
    /// `exclude` are not descended into.
    pub fn discover(root: &Path, exclude: &[String], patterns: &Patterns) -> Result<Self> {
        if !root.is_dir() {
            return Err(AuditError::RootNotFound(root.to_path_buf()));
        }

        info!("Starting skills discovery in {:?}", root);

        let mut skills = Vec::new();
        let mut findings = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, exclude));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(AuditError::Walk(e)),
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    findings.push(Finding::error(
                        relative(root, &path),
                        RuleId::UnreadablePath,
                        format!("could not be traversed: {e}"),
                    ));
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != SKILL_FILE {
                continue;
            }

            let Some(dir) = entry.path().parent() else {
                continue;
            };

            if let Some(skill) = Skill::load(root, dir, patterns, &mut findings) {
                debug!(
                    "Discovered skill: {} ({} rules)",
                    skill.name(),
                    skill.rules.len()
                );
                skills.push(skill);
            }
        }

        info!(
            "Discovered {} skills, {} rule files",
            skills.len(),
            skills.iter().map(|s| s.rules.len()).sum::<usize>()
        );

        Ok(Self {
            root: root.to_path_buf(),
            skills,
            findings,
        })
    }

    /// Build a corpus from already loaded skills
    pub fn from_skills(root: impl Into<PathBuf>, skills: Vec<Skill>) -> Self {
        Self {
            root: root.into(),
            skills,
            findings: Vec::new(),
        }
    }

    /// Root the corpus was discovered from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loaded skills, in path order
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Findings produced while loading (parse and schema problems)
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Look up a skill by name
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.name() == name)
    }

    /// Get number of skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if corpus is empty
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Hidden entries and excluded directories are pruned from the walk
fn is_skipped(entry: &walkdir::DirEntry, exclude: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && exclude.iter().any(|excluded| name == excluded.as_str())
}
