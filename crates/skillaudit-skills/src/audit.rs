//! Audit driver: discovery, schema checks, cross-references, report

use crate::corpus::{Corpus, DEFAULT_EXCLUDES};
use crate::crossref;
use crate::error::Result;
use crate::marketplace::{self, Registry, DEFAULT_LOCATIONS};
use crate::patterns::Patterns;
use crate::report::Report;
use crate::skill::relative;
use skillaudit_types::CorpusPath;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs that shape an audit run
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Registry file; when unset the default locations under the root are probed
    pub registry: Option<PathBuf>,
    /// Directory names not descended into
    pub exclude: Vec<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            registry: None,
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Runs one audit over a snapshot of a skills tree
#[derive(Debug, Clone)]
pub struct Auditor {
    options: AuditOptions,
    patterns: Patterns,
}

impl Auditor {
    /// Create an auditor, compiling its patterns
    pub fn new(options: AuditOptions) -> Result<Self> {
        Ok(Self {
            options,
            patterns: Patterns::compile()?,
        })
    }

    /// Audit the tree under `root`.
    ///
    /// Only unrecoverable problems (missing root, unreadable or malformed
    /// registry) are returned as errors; everything else is in the report.
    pub fn run(&self, root: &Path) -> Result<Report> {
        let corpus = Corpus::discover(root, &self.options.exclude, &self.patterns)?;
        let (registry, registry_path) = self.load_registry(root)?;

        let mut findings = corpus.findings().to_vec();
        findings.extend(crossref::check(&corpus, &registry, &registry_path));

        let report = Report::new(findings);
        info!(
            "Audit finished: {} skills, {} errors, {} warnings",
            corpus.len(),
            report.error_count(),
            report.warning_count()
        );
        Ok(report)
    }

    fn load_registry(&self, root: &Path) -> Result<(Registry, CorpusPath)> {
        let file = match &self.options.registry {
            Some(explicit) => Some(explicit.clone()),
            None => marketplace::locate(root),
        };

        match file {
            Some(file) => {
                let registry = Registry::load(&file)?;
                Ok((registry, relative(root, &file)))
            }
            None => {
                warn!(
                    "No registry found under {:?}; versioned skills will be reported as missing from it",
                    root
                );
                Ok((Registry::empty(), CorpusPath::new(DEFAULT_LOCATIONS[0])))
            }
        }
    }
}
