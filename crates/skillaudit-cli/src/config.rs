use crate::args::Cli;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use skillaudit_skills::OutputFormat;
use std::env;
use std::path::{Path, PathBuf};

/// Built-in defaults, the lowest configuration layer
const DEFAULT_CONFIG: &str = r#"
[audit]
strict = false            # treat warnings as errors
format = "text"           # text or json
exclude = ["node_modules", "target"]
# registry = "marketplace.json"  # defaults to <root>/marketplace.json

[logging]
level = "warn"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    pub strict: bool,
    pub format: OutputFormat,
    pub exclude: Vec<String>,
    #[serde(default)]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.skillaudit/skillaudit.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillaudit").join("skillaudit.toml"))
    }

    fn defaults_builder() -> ConfigBuilder<DefaultState> {
        config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// Load configuration with layered approach:
    /// 1. Built-in defaults
    /// 2. Global config: ~/.skillaudit/skillaudit.toml (optional, never created)
    /// 3. Local override: ./skillaudit.toml (optional)
    /// 4. Explicit `--config` file
    /// 5. Environment variables (SKILLAUDIT__AUDIT__STRICT=true, ...)
    ///
    /// Command-line flags are applied afterwards with [`Config::apply_cli`].
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = Self::defaults_builder();

        if let Some(global) = Self::global_config_path() {
            config_builder = config_builder.add_source(File::from(global).required(false));
        }

        config_builder = config_builder.add_source(File::with_name("skillaudit").required(false));

        if let Some(path) = explicit {
            config_builder = config_builder.add_source(File::from(path.to_path_buf()));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("SKILLAUDIT")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("audit.exclude"),
        );

        // Convenience override, same spirit as RUST_LOG
        if let Ok(level) = env::var("SKILLAUDIT_LOG") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config = config_builder.build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config)
    }

    /// Command-line flags win over every file and environment layer
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.strict {
            self.audit.strict = true;
        }
        if let Some(registry) = &cli.registry {
            self.audit.registry = Some(registry.clone());
        }
        if let Some(format) = cli.format {
            self.audit.format = format;
        }
        if !cli.exclude.is_empty() {
            self.audit.exclude = cli.exclude.clone();
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
    }
}
