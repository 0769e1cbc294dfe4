//! Command-line arguments

use clap::Parser;
use skillaudit_skills::OutputFormat;
use std::path::PathBuf;

/// Audit a skills corpus: frontmatter schema, registry versions, rule sections
#[derive(Parser, Debug, Clone)]
#[command(name = "skills-audit", version, about)]
pub struct Cli {
    /// Root of the skills tree
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Treat warnings as errors when computing the exit status
    #[arg(long)]
    pub strict: bool,

    /// Registry file [default: PATH/marketplace.json, then PATH/.claude-plugin/marketplace.json]
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Report format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Directory name to skip; repeatable, replaces the configured list
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Extra config file layered over the global and local ones
    #[arg(long, value_name = "FILE", env = "SKILLAUDIT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["skills-audit"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(!cli.strict);
        assert!(cli.format.is_none());
        assert!(cli.exclude.is_empty());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "skills-audit",
            "skills",
            "--strict",
            "--registry",
            ".claude-plugin/marketplace.json",
            "--format",
            "json",
            "--exclude",
            "vendor",
            "--exclude",
            "dist",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("skills"));
        assert!(cli.strict);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.exclude, vec!["vendor", "dist"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["skills-audit", "--format", "xml"]).is_err());
    }
}
