//! skillaudit Skills Auditor
//!
//! Consistency checks for a skills corpus: directories holding a SKILL.md
//! manifest with YAML frontmatter, optional `rules/` files grouped into
//! sections, and a central `marketplace.json` registry.
//!
//! ## Pipeline
//!
//! 1. Discovery: walk the tree and parse every SKILL.md, `_sections.md` and rule file
//! 2. Schema: check each frontmatter block against the closed field list for its kind
//! 3. Cross-reference: versions against the registry, rule prefixes against
//!    sections, `extends` targets, duplicate names
//! 4. Report: sorted findings, one line each, and an exit status
//!
//! Every step works on an immutable snapshot taken at the start of the run.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod audit;
pub mod corpus;
pub mod crossref;
pub mod error;
pub mod frontmatter;
pub mod marketplace;
pub mod patterns;
pub mod report;
pub mod schema;
pub mod sections;
pub mod skill;

pub use audit::{AuditOptions, Auditor};
pub use corpus::Corpus;
pub use error::{AuditError, FrontmatterError};
pub use marketplace::Registry;
pub use report::{OutputFormat, Report};
pub use skill::Skill;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AuditOptions, Auditor, Corpus, OutputFormat, Registry, Report, Skill};
}
