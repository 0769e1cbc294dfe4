mod args;
mod config;
mod service;

use anyhow::Result;
use crate::args::Cli;
use crate::config::Config;
use crate::service::AuditService;
use clap::Parser;
use skillaudit_skills::report::EXIT_FATAL;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("skills-audit: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    // Load configuration, then let flags override it
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let audit = AuditService::new(config, cli.path);
    audit.run()
}
