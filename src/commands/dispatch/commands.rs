//! Command implementations for all materia commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use materia_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        dispatch_command::execute(self, ctx)
    }
}

pub(super) mod dispatch_command {
    use super::*;

    use materia_core::service::SimilarQuery;
    use tracing::debug;

    use crate::commands::{compare, config, list, normalize, similar};

    pub(super) fn execute(cmd: &Commands, ctx: &CommandContext) -> Result<()> {
        match cmd {
            Commands::Similar {
                ids,
                min_similarity,
                max_results,
            } => {
                let query = SimilarQuery {
                    min_similarity: *min_similarity,
                    max_results: *max_results,
                };
                execute_with_service(ctx, |service| similar::execute(ctx.cli, service, ids, query))
            }
            Commands::Compare { a, b } => {
                execute_with_service(ctx, |service| compare::execute(ctx.cli, service, a, b))
            }
            Commands::Normalize { id } => {
                execute_with_service(ctx, |service| normalize::execute(ctx.cli, service, id))
            }
            Commands::List => execute_with_service(ctx, |service| list::execute(ctx.cli, service)),
            Commands::Config => config::execute(ctx.cli, &ctx.config),
        }
    }

    fn execute_with_service(
        ctx: &CommandContext,
        run: impl FnOnce(&materia_core::service::SimilarityService) -> Result<()>,
    ) -> Result<()> {
        let service = ctx.service()?;
        debug!(elapsed = ?ctx.start.elapsed(), "open_service");
        let result = run(&service);
        debug!(elapsed = ?ctx.start.elapsed(), "execute_command");
        result
    }
}
