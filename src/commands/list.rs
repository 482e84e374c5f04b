//! `materia list` command - list formulas in the pool

use crate::cli::{Cli, OutputFormat};
use materia_core::error::Result;
use materia_core::format::escape_quotes;
use materia_core::service::SimilarityService;

/// Execute the list command
pub fn execute(cli: &Cli, service: &SimilarityService) -> Result<()> {
    let formulas = service.formulas()?;

    match cli.format {
        OutputFormat::Json => {
            let output: Vec<_> = formulas
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "id": f.id,
                        "title": f.title,
                        "ingredients": f.ingredient_count(),
                        "total_weight": f.total_weight,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if formulas.is_empty() {
                if !cli.quiet {
                    println!("No formulas found");
                }
            } else {
                for formula in formulas.iter() {
                    println!(
                        "{} {} ({} ingredients)",
                        formula.id,
                        formula.title,
                        formula.ingredient_count()
                    );
                }
            }
        }
        OutputFormat::Records => {
            println!(
                "H materia=1 records=1 source={} mode=list formulas={}",
                service.source_description(),
                formulas.len()
            );
            for formula in formulas.iter() {
                println!(
                    "F {} \"{}\" ingredients={}",
                    formula.id,
                    escape_quotes(&formula.title),
                    formula.ingredient_count()
                );
            }
        }
    }

    Ok(())
}
