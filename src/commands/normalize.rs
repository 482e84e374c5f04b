//! `materia normalize` command - show a formula's percentage profile

use crate::cli::{Cli, OutputFormat};
use materia_core::error::Result;
use materia_core::format::{escape_quotes, one_decimal};
use materia_core::service::SimilarityService;
use materia_core::similarity::normalize;

/// Execute the normalize command
pub fn execute(cli: &Cli, service: &SimilarityService, id: &str) -> Result<()> {
    let formula = service.formula(id)?;
    let profile = normalize(&formula.ingredients, formula.total_weight);

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": formula.id,
                "title": formula.title,
                "total_weight": formula.total_weight,
                "ingredients": profile,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("{} ({})", formula.title, formula.id);
            }
            if profile.is_empty() {
                if !cli.quiet {
                    println!("  No ingredients listed");
                }
                return Ok(());
            }
            for ingredient in &profile {
                println!(
                    "  {:<24} {:>5}%",
                    ingredient.name,
                    one_decimal(ingredient.percentage)
                );
            }
        }
        OutputFormat::Records => {
            println!(
                "H materia=1 records=1 source={} mode=normalize",
                service.source_description()
            );
            println!(
                "F {} \"{}\" ingredients={}",
                formula.id,
                escape_quotes(&formula.title),
                profile.len()
            );
            for ingredient in &profile {
                println!(
                    "I {} {} \"{}\" pct={}",
                    formula.id,
                    ingredient.id,
                    escape_quotes(&ingredient.name),
                    one_decimal(ingredient.percentage)
                );
            }
        }
    }

    Ok(())
}
