//! `materia` binary: ranks herbal formulas by ingredient similarity.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::error::{Error as ClapError, ErrorKind};
use clap::Parser;

use cli::{Cli, OutputFormat};
use materia_core::error::{ExitCode as MateriaExitCode, MateriaError};
use materia_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return exit_on_parse_error(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(MateriaExitCode::Success as u8),
        Err(e) => report(&cli, &e),
    }
}

/// Print a failed command's error in the requested format
fn report(cli: &Cli, error: &MateriaError) -> ExitCode {
    match cli.format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        _ if cli.quiet => {}
        _ => eprintln!("error: {}", error),
    }
    ExitCode::from(error.exit_code() as u8)
}

/// Argument errors happen before `--format` is known, so peek at argv to
/// decide between clap's own message and the JSON envelope
fn exit_on_parse_error(err: ClapError) -> ExitCode {
    let wants_json = json_format_requested(std::env::args().skip(1));
    if !wants_json || matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.exit();
    }

    let error = match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand => MateriaError::UsageError(err.to_string()),
        _ => MateriaError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    ExitCode::from(error.exit_code() as u8)
}

fn json_format_requested(mut args: impl Iterator<Item = String>) -> bool {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format=json" => return true,
            "--format" if args.next().as_deref() == Some("json") => return true,
            _ => {}
        }
    }
    false
}
