//! CLI argument parsing for materia
//!
//! Global flags: --config, --source, --url, --format, --quiet, --verbose

pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use materia_core::format::OutputFormat;
use parse::{parse_max_results, parse_min_similarity, parse_output_format};

/// Materia - herbal formula similarity CLI
#[derive(Parser, Debug)]
#[command(name = "materia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ~/.config/materia/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file holding the formula pool
    #[arg(long, global = true, conflicts_with = "url")]
    pub source: Option<PathBuf>,

    /// Content API endpoint returning the formula pool
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Output format (human, json, records)
    #[arg(long, global = true, default_value = "human", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank formulas similar to one or more formulas
    Similar {
        /// Formula id(s)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Minimum composite score (0-100)
        #[arg(long, value_parser = parse_min_similarity)]
        min_similarity: Option<u32>,

        /// Maximum results per formula
        #[arg(long, short = 'n', value_parser = parse_max_results)]
        max_results: Option<usize>,
    },

    /// Score two formulas against each other
    Compare {
        /// Source formula id
        a: String,

        /// Target formula id
        b: String,
    },

    /// Show a formula's normalized percentage profile
    Normalize {
        /// Formula id
        id: String,
    },

    /// List formulas in the pool
    List,

    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_similar_args() {
        let cli = Cli::try_parse_from([
            "materia",
            "--source",
            "pool.json",
            "similar",
            "gui-zhi-tang",
            "ma-huang-tang",
            "--min-similarity",
            "25",
            "-n",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.source, Some(PathBuf::from("pool.json")));
        match cli.command {
            Some(Commands::Similar {
                ids,
                min_similarity,
                max_results,
            }) => {
                assert_eq!(ids, vec!["gui-zhi-tang", "ma-huang-tang"]);
                assert_eq!(min_similarity, Some(25));
                assert_eq!(max_results, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_similar_requires_id() {
        assert!(Cli::try_parse_from(["materia", "similar"]).is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(Cli::try_parse_from(["materia", "similar", "x", "--min-similarity", "101"]).is_err());
        assert!(Cli::try_parse_from(["materia", "similar", "x", "--max-results", "0"]).is_err());
    }

    #[test]
    fn test_source_conflicts_with_url() {
        let result = Cli::try_parse_from([
            "materia",
            "--source",
            "pool.json",
            "--url",
            "http://localhost/formulas",
            "list",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_is_global() {
        let cli = Cli::try_parse_from(["materia", "list", "--format", "records"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Records);
    }
}
