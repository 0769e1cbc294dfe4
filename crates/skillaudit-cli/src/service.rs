use crate::config::Config;
use anyhow::{Context, Result};
use skillaudit_skills::{AuditOptions, Auditor};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Audit service - runs one audit and prints the report
pub struct AuditService {
    config: Config,
    root: PathBuf,
}

impl AuditService {
    /// Create a new audit service
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Run the audit and return the process exit status
    pub fn run(self) -> Result<u8> {
        // Initialize logging
        skillaudit_logging::init_logging(&self.config.logging.level)?;
        info!("Auditing skills tree at {:?}", self.root);
        debug!(
            "Audit config: strict={}, format={}, exclude={:?}, registry={:?}",
            self.config.audit.strict,
            self.config.audit.format,
            self.config.audit.exclude,
            self.config.audit.registry
        );

        let options = AuditOptions {
            registry: self.config.audit.registry.clone(),
            exclude: self.config.audit.exclude.clone(),
        };
        let auditor = Auditor::new(options)?;
        let report = auditor
            .run(&self.root)
            .with_context(|| format!("audit of {} failed", self.root.display()))?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        report
            .emit(&mut out, self.config.audit.format)
            .context("failed to write report")?;
        out.flush().context("failed to flush report")?;

        Ok(report.exit_code(self.config.audit.strict))
    }
}
