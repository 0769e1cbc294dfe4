//! Error types for skill corpus auditing

use std::path::PathBuf;
use thiserror::Error;

/// Per-file frontmatter failure. Reported as a finding; the file is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    /// File does not open with a `---` line
    #[error("file does not start with a '---' frontmatter block")]
    Missing,

    /// Opening `---` has no closing `---`
    #[error("frontmatter block is not closed by a '---' line")]
    Unterminated,

    /// Block is not valid YAML
    #[error("invalid YAML: {0}")]
    Yaml(String),

    /// Top level of the block is not a key/value mapping
    #[error("frontmatter must be a key/value mapping")]
    NotAMapping,

    /// Mapping key is not a string
    #[error("frontmatter keys must be strings")]
    NonStringKey,

    /// Field failed type coercion
    #[error("field '{field}' {reason}")]
    Coercion {
        /// Field name
        field: String,
        /// What was wrong with the value
        reason: String,
    },
}

/// Unrecoverable audit errors. These abort the run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Root path missing or not a directory
    #[error("skills root {} does not exist or is not a directory", .0.display())]
    RootNotFound(PathBuf),

    /// Registry file could not be read
    #[error("failed to read registry {}: {source}", path.display())]
    RegistryUnreadable {
        /// Registry path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid JSON or has the wrong shape
    #[error("malformed registry {}: {source}", path.display())]
    RegistryMalformed {
        /// Registry path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Built-in pattern failed to compile
    #[error("invalid built-in pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Directory traversal failed
    #[error("failed to walk skills tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AuditError>;
