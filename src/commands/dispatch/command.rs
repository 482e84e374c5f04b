//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::Cli;
use materia_core::config::{Config, ContentConfig};
use materia_core::content::{FileSource, FormulaSource, HttpSource};
use materia_core::error::{MateriaError, Result};
use materia_core::service::SimilarityService;

/// Resolve the effective configuration: file, then environment, then flags
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    config.apply_env();

    if let Some(path) = &cli.source {
        config.content.path = Some(path.clone());
        config.content.url = None;
    }
    if let Some(url) = &cli.url {
        config.content.url = Some(url.clone());
        config.content.path = None;
    }

    Ok(config)
}

/// Open the configured content source; a URL wins over a file path
pub fn open_source(content: &ContentConfig) -> Result<Box<dyn FormulaSource>> {
    if let Some(url) = &content.url {
        return Ok(Box::new(HttpSource::new(url.as_str(), content.timeout_secs)));
    }
    if let Some(path) = &content.path {
        return Ok(Box::new(FileSource::new(path)));
    }
    Err(MateriaError::NoContentSource)
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: Config,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, config: Config, start: Instant) -> Self {
        Self { cli, config, start }
    }

    /// Build a similarity service over the configured source
    pub fn service(&self) -> Result<SimilarityService> {
        let source = open_source(&self.config.content)?;
        tracing::debug!(source = %source.describe(), "open_source");
        Ok(SimilarityService::new(
            source,
            self.config.similarity.clone(),
            self.config.cache.clone(),
        ))
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("materia {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Rank herbal formulas by ingredient similarity.");
        println!();
        println!("Run `materia --help` for usage information.");
        Ok(())
    }
}
