//! Report emission
//!
//! Findings are sorted by file, rule and message so two runs over an
//! unchanged tree produce byte-identical output.

use serde::{Deserialize, Serialize};
use skillaudit_types::{CorpusPath, Finding};
use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Exit status when nothing was found
pub const EXIT_CLEAN: u8 = 0;
/// Exit status when at least one violation counts against the run
pub const EXIT_VIOLATIONS: u8 = 1;
/// Exit status for unrecoverable errors (missing root, bad registry)
pub const EXIT_FATAL: u8 = 2;

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<file>: <rule-id>: <message>` lines plus a summary
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Aggregated findings of one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    findings: Vec<Finding>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    errors: usize,
    warnings: usize,
    files: usize,
}

impl Report {
    /// Sort and de-duplicate findings
    pub fn new(mut findings: Vec<Finding>) -> Self {
        findings.sort();
        findings.dedup();
        Self { findings }
    }

    /// Findings in report order
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of error findings
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    /// Number of warning findings
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }

    /// Number of distinct files with at least one finding
    pub fn file_count(&self) -> usize {
        self.findings
            .iter()
            .map(|f| &f.path)
            .collect::<BTreeSet<&CorpusPath>>()
            .len()
    }

    /// Whether nothing at all was found
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Process exit status. With `strict`, warnings count as errors.
    pub fn exit_code(&self, strict: bool) -> u8 {
        let counted = if strict {
            self.findings.len()
        } else {
            self.error_count()
        };
        if counted == 0 {
            EXIT_CLEAN
        } else {
            EXIT_VIOLATIONS
        }
    }

    /// Write the report in the requested format
    pub fn emit<W: Write>(&self, out: &mut W, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Json => self.write_json(out),
        }
    }

    /// One line per finding, then a summary line
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for finding in &self.findings {
            writeln!(out, "{finding}")?;
        }

        if self.is_clean() {
            writeln!(out, "no violations found")
        } else {
            writeln!(
                out,
                "{} error(s), {} warning(s) in {} file(s)",
                self.error_count(),
                self.warning_count(),
                self.file_count()
            )
        }
    }

    /// Pretty-printed JSON document with counts
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let report = JsonReport {
            findings: &self.findings,
            errors: self.error_count(),
            warnings: self.warning_count(),
            files: self.file_count(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)
    }
}
