//! Section index parsing (`rules/_sections.md`)
//!
//! ```text
//! ## 1. Eliminating Waterfalls (async)
//!
//! **Impact:** CRITICAL
//! **Description:** Waterfalls are the #1 performance killer.
//! ```

use crate::patterns::Patterns;
use skillaudit_types::{Impact, RuleFile, Section};
use std::collections::BTreeSet;

/// File name of the per-skill section index
pub const SECTIONS_FILE: &str = "_sections.md";

/// Sections declared for one skill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    /// Build an index from already parsed sections
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Declared sections in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whether no section is declared
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section owning a rule file: the longest declared id the file name falls under
    pub fn section_for(&self, rule: &RuleFile) -> Option<&Section> {
        self.sections
            .iter()
            .filter(|section| rule.belongs_to(&section.id))
            .max_by_key(|section| section.id.len())
    }
}

/// Result of parsing a section index file
#[derive(Debug, Clone, Default)]
pub struct ParsedSections {
    /// Sections that were declared
    pub index: SectionIndex,
    /// Problems found while parsing, one message each
    pub problems: Vec<String>,
}

/// Parse the contents of a `_sections.md` file
pub fn parse(content: &str, patterns: &Patterns) -> ParsedSections {
    let mut sections: Vec<Section> = Vec::new();
    let mut problems = Vec::new();
    let mut seen = BTreeSet::new();
    let mut with_impact_line = BTreeSet::new();

    for line in content.lines() {
        let line = line.trim_end();

        if let Some(caps) = patterns.section_heading.captures(line) {
            let id = caps[3].to_string();
            let order = match caps[1].parse::<u32>() {
                Ok(order) => order,
                Err(_) => {
                    problems.push(format!("section '{id}' number {} is out of range", &caps[1]));
                    0
                }
            };
            if !seen.insert(id.clone()) {
                problems.push(format!("section id '{id}' is declared more than once"));
            }
            sections.push(Section {
                id,
                title: caps[2].trim().to_string(),
                impact: None,
                description: String::new(),
                order,
            });
            continue;
        }

        if line.starts_with("## ") {
            // Heading without an id; nothing to attach fields to
            continue;
        }

        let position = sections.len().saturating_sub(1);
        let Some(current) = sections.last_mut() else {
            continue;
        };
        let Some(caps) = patterns.section_field.captures(line) else {
            continue;
        };
        let value = caps[2].trim();
        match &caps[1] {
            "Impact" => {
                with_impact_line.insert(position);
                let token = value.split_whitespace().next().unwrap_or("");
                match token.parse::<Impact>() {
                    Ok(impact) => current.impact = Some(impact),
                    Err(e) => problems.push(format!("section '{}' impact {e}", current.id)),
                }
            }
            _ => current.description = value.to_string(),
        }
    }

    for (position, section) in sections.iter().enumerate() {
        if !with_impact_line.contains(&position) {
            problems.push(format!("section '{}' has no **Impact:** line", section.id));
        }
    }

    ParsedSections {
        index: SectionIndex::new(sections),
        problems,
    }
}
