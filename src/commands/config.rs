//! `materia config` command - show the effective configuration

use crate::cli::{Cli, OutputFormat};
use materia_core::config::Config;
use materia_core::error::Result;

/// Execute the config command
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                let path = match &cli.config {
                    Some(path) => path.display().to_string(),
                    None => Config::default_path()?.display().to_string(),
                };
                println!("# {}", path);
            }
            print!("{}", config.to_toml()?);
        }
        OutputFormat::Records => {
            println!("H materia=1 records=1 mode=config");
            println!(
                "C similarity min_similarity={} max_results={}",
                config.similarity.min_similarity, config.similarity.max_results
            );
            println!(
                "C cache pool_ttl_secs={} ranking_ttl_secs={} sweep_interval_secs={}",
                config.cache.pool_ttl_secs,
                config.cache.ranking_ttl_secs,
                config.cache.sweep_interval_secs
            );
            let path = config
                .content
                .path
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string());
            let url = config.content.url.as_deref().unwrap_or("-");
            println!(
                "C content path={} url={} timeout_secs={}",
                path, url, config.content.timeout_secs
            );
        }
    }

    Ok(())
}
