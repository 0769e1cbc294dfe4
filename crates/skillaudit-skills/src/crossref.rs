//! Cross-file consistency checks
//!
//! Runs over a loaded [`Corpus`] and the registry snapshot. Pure and
//! deterministic: the same inputs always give the same findings.

use crate::corpus::Corpus;
use crate::marketplace::Registry;
use crate::skill::Skill;
use skillaudit_types::{CorpusPath, Finding, RuleId};
use std::collections::{BTreeMap, BTreeSet};

/// Run every cross-reference check. `registry_path` is where registry findings are reported.
pub fn check(corpus: &Corpus, registry: &Registry, registry_path: &CorpusPath) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_versions(corpus, registry, &mut findings);
    check_sections(corpus, &mut findings);
    check_extends(corpus, &mut findings);
    check_duplicate_names(corpus, &mut findings);
    check_registry_orphans(corpus, registry, registry_path, &mut findings);
    check_registry_drift(corpus, registry, &mut findings);
    check_directory_names(corpus, &mut findings);

    findings
}

/// Skills that declared a usable name
fn named(corpus: &Corpus) -> impl Iterator<Item = &Skill> {
    corpus.skills().iter().filter(|skill| !skill.name().is_empty())
}

fn check_versions(corpus: &Corpus, registry: &Registry, out: &mut Vec<Finding>) {
    for skill in named(corpus) {
        // Absence of a version is never a mismatch
        let Some(version) = skill.manifest.version else {
            continue;
        };

        let message = match registry.get(skill.name()).map(|entry| entry.version) {
            None => format!(
                "version {version} declared but the registry has no entry for '{}'",
                skill.name()
            ),
            Some(None) => format!(
                "version {version} declared but the registry entry for '{}' has no version",
                skill.name()
            ),
            Some(Some(listed)) if listed != version => {
                format!("version {version} does not match registry version {listed}")
            }
            Some(Some(_)) => continue,
        };

        out.push(Finding::error(
            skill.manifest.path.clone(),
            RuleId::VersionMismatch,
            message,
        ));
    }
}

fn check_sections(corpus: &Corpus, out: &mut Vec<Finding>) {
    for skill in corpus.skills() {
        for rule in &skill.rules {
            let declared = skill
                .sections
                .as_ref()
                .and_then(|index| index.section_for(rule));
            if declared.is_some() {
                continue;
            }

            let message = match &skill.sections {
                Some(_) => format!(
                    "rule prefix '{}' has no declared section in {}",
                    rule.naive_prefix(),
                    skill.sections_path()
                ),
                None => format!(
                    "rule prefix '{}' has no declared section ({} does not exist)",
                    rule.naive_prefix(),
                    skill.sections_path()
                ),
            };
            out.push(Finding::error(rule.path.clone(), RuleId::UnknownSection, message));
        }
    }
}

fn check_extends(corpus: &Corpus, out: &mut Vec<Finding>) {
    let names: BTreeSet<&str> = named(corpus).map(Skill::name).collect();

    for skill in corpus.skills() {
        let Some(target) = skill.manifest.extends.as_deref() else {
            continue;
        };

        let message = if target == skill.name() {
            format!("extends '{target}', which is the skill itself")
        } else if !names.contains(target) {
            format!("extends '{target}' but no skill with that name exists")
        } else {
            continue;
        };

        out.push(Finding::error(
            skill.manifest.path.clone(),
            RuleId::DanglingExtends,
            message,
        ));
    }
}

fn check_duplicate_names(corpus: &Corpus, out: &mut Vec<Finding>) {
    let mut by_name: BTreeMap<&str, Vec<&CorpusPath>> = BTreeMap::new();
    for skill in named(corpus) {
        by_name
            .entry(skill.name())
            .or_default()
            .push(&skill.manifest.path);
    }

    for (name, mut paths) in by_name {
        if paths.len() < 2 {
            continue;
        }
        paths.sort();
        let first = paths[0];
        for duplicate in &paths[1..] {
            out.push(Finding::error(
                (*duplicate).clone(),
                RuleId::DuplicateSkillName,
                format!("skill name '{name}' is already declared in {first}"),
            ));
        }
    }
}

fn check_registry_orphans(
    corpus: &Corpus,
    registry: &Registry,
    registry_path: &CorpusPath,
    out: &mut Vec<Finding>,
) {
    let names: BTreeSet<&str> = named(corpus).map(Skill::name).collect();

    for entry in registry.entries() {
        if !names.contains(entry.name.as_str()) {
            out.push(Finding::warning(
                registry_path.clone(),
                RuleId::OrphanRegistryEntry,
                format!("registry entry '{}' has no SKILL.md in the corpus", entry.name),
            ));
        }
    }
}

fn check_registry_drift(corpus: &Corpus, registry: &Registry, out: &mut Vec<Finding>) {
    for skill in named(corpus) {
        let Some(category) = skill.manifest.category else {
            continue;
        };
        let Some(listed) = registry
            .get(skill.name())
            .and_then(|entry| entry.category.as_deref())
        else {
            continue;
        };

        if !listed.eq_ignore_ascii_case(category.as_str()) {
            out.push(Finding::warning(
                skill.manifest.path.clone(),
                RuleId::RegistryDrift,
                format!("category '{category}' differs from registry category '{listed}'"),
            ));
        }
    }
}

fn check_directory_names(corpus: &Corpus, out: &mut Vec<Finding>) {
    for skill in named(corpus) {
        let dir_name = skill.manifest.dir_name();
        // Manifest at the audited root: the directory name is not part of the corpus
        if dir_name.is_empty() {
            continue;
        }
        if dir_name != skill.name() {
            out.push(Finding::warning(
                skill.manifest.path.clone(),
                RuleId::NameDirectoryMismatch,
                format!(
                    "name '{}' does not match directory '{dir_name}'",
                    skill.name()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionIndex;
    use skillaudit_types::{Category, RegistryEntry, RuleFile, Section, SkillManifest};

    fn skill(name: &str, dir: &str) -> Skill {
        let mut manifest = SkillManifest::new(name, CorpusPath::new(dir).join("SKILL.md"));
        manifest.category = Some(Category::Universal);
        Skill {
            manifest,
            sections: None,
            rules: Vec::new(),
        }
    }

    fn registry_path() -> CorpusPath {
        CorpusPath::new("marketplace.json")
    }

    fn rules_of(findings: &[Finding]) -> Vec<RuleId> {
        findings.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn test_consistent_corpus_is_clean() {
        let mut a = skill("a", "a");
        a.manifest.version = Some(2);
        let corpus = Corpus::from_skills("/corpus", vec![a, skill("b", "b")]);
        let registry = Registry::from_entries([
            RegistryEntry::new("a").with_version(2),
            RegistryEntry::new("b"),
        ]);
        assert!(check(&corpus, &registry, &registry_path()).is_empty());
    }

    #[test]
    fn test_version_absent_is_not_a_mismatch() {
        let corpus = Corpus::from_skills("/corpus", vec![skill("agents-md", "agents-md")]);
        let registry = Registry::from_entries([RegistryEntry::new("agents-md").with_version(1)]);
        assert!(check(&corpus, &registry, &registry_path()).is_empty());
    }

    #[test]
    fn test_version_without_registry_entry() {
        let mut a = skill("a", "a");
        a.manifest.version = Some(2);
        let corpus = Corpus::from_skills("/corpus", vec![a]);
        let findings = check(&corpus, &Registry::empty(), &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::VersionMismatch]);
        assert!(findings[0].message.contains("no entry"));
    }

    #[test]
    fn test_version_differs() {
        let mut a = skill("a", "a");
        a.manifest.version = Some(3);
        let corpus = Corpus::from_skills("/corpus", vec![a]);
        let registry = Registry::from_entries([RegistryEntry::new("a").with_version(2)]);
        let findings = check(&corpus, &registry, &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::VersionMismatch]);
        assert_eq!(findings[0].message, "version 3 does not match registry version 2");
    }

    #[test]
    fn test_unknown_section() {
        let mut a = skill("a", "a");
        a.sections = Some(SectionIndex::new(vec![Section {
            id: "async".to_string(),
            title: "Async".to_string(),
            impact: None,
            description: String::new(),
            order: 1,
        }]));
        a.rules = vec![
            RuleFile::new("ok", CorpusPath::new("a/rules/async-parallel.md")),
            RuleFile::new("bad", CorpusPath::new("a/rules/bundle-barrel.md")),
        ];
        let corpus = Corpus::from_skills("/corpus", vec![a]);
        let findings = check(&corpus, &Registry::from_entries([RegistryEntry::new("a")]), &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::UnknownSection]);
        assert_eq!(findings[0].path.as_str(), "a/rules/bundle-barrel.md");
        assert!(findings[0].message.contains("'bundle'"));
    }

    #[test]
    fn test_rules_without_section_index() {
        let mut a = skill("a", "a");
        a.rules = vec![RuleFile::new("r", CorpusPath::new("a/rules/js-cache.md"))];
        let corpus = Corpus::from_skills("/corpus", vec![a]);
        let findings = check(&corpus, &Registry::from_entries([RegistryEntry::new("a")]), &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::UnknownSection]);
        assert!(findings[0].message.contains("a/rules/_sections.md does not exist"));
    }

    #[test]
    fn test_dangling_and_self_extends() {
        let mut a = skill("a", "a");
        a.manifest.extends = Some("missing".to_string());
        let mut b = skill("b", "b");
        b.manifest.extends = Some("b".to_string());
        let mut c = skill("c", "c");
        c.manifest.extends = Some("a".to_string());
        let corpus = Corpus::from_skills("/corpus", vec![a, b, c]);
        let registry = Registry::from_entries(["a", "b", "c"].map(|name| RegistryEntry::new(name)));
        let findings = check(&corpus, &registry, &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::DanglingExtends, RuleId::DanglingExtends]);
        assert_eq!(findings[0].path.as_str(), "a/SKILL.md");
        assert_eq!(findings[1].path.as_str(), "b/SKILL.md");
    }

    #[test]
    fn test_duplicate_names_reference_both_paths() {
        let corpus = Corpus::from_skills(
            "/corpus",
            vec![skill("dup", "z/dup"), skill("dup", "a/dup")],
        );
        let registry = Registry::from_entries([RegistryEntry::new("dup")]);
        let findings = check(&corpus, &registry, &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::DuplicateSkillName]);
        assert_eq!(findings[0].path.as_str(), "z/dup/SKILL.md");
        assert!(findings[0].message.contains("a/dup/SKILL.md"));
    }

    #[test]
    fn test_registry_orphans_and_drift() {
        let corpus = Corpus::from_skills("/corpus", vec![skill("a", "a")]);
        let mut entry = RegistryEntry::new("a");
        entry.category = Some("framework".to_string());
        let registry = Registry::from_entries([entry, RegistryEntry::new("gone")]);
        let findings = check(&corpus, &registry, &registry_path());
        assert_eq!(
            rules_of(&findings),
            vec![RuleId::OrphanRegistryEntry, RuleId::RegistryDrift]
        );
        assert_eq!(findings[0].path.as_str(), "marketplace.json");
        assert!(findings.iter().all(|f| !f.is_error()));
    }

    #[test]
    fn test_directory_name_mismatch() {
        let corpus = Corpus::from_skills("/corpus", vec![skill("a", "skills/b"), skill("root", "")]);
        let registry = Registry::from_entries(["a", "root"].map(|name| RegistryEntry::new(name)));
        let findings = check(&corpus, &registry, &registry_path());
        assert_eq!(rules_of(&findings), vec![RuleId::NameDirectoryMismatch]);
        assert!(findings[0].message.contains("directory 'b'"));
    }
}
