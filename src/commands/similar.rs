//! `materia similar` command - rank formulas similar to given formulas
//!
//! The pool is fetched once per run; every id after the first is served from
//! the pool cache.

use crate::cli::{Cli, OutputFormat};
use materia_core::error::Result;
use materia_core::format::{escape_quotes, one_decimal};
use materia_core::service::{LookupStatus, SimilarFormulas, SimilarQuery, SimilarityService};

/// Execute the similar command
pub fn execute(
    cli: &Cli,
    service: &SimilarityService,
    ids: &[String],
    query: SimilarQuery,
) -> Result<()> {
    let lookups = ids
        .iter()
        .map(|id| service.similar_formulas(id, query))
        .collect::<Result<Vec<_>>>()?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&lookups)?);
        }
        OutputFormat::Human => {
            for (index, lookup) in lookups.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                print_human(cli, lookup);
            }
        }
        OutputFormat::Records => {
            println!(
                "H materia=1 records=1 source={} mode=similar formulas={}",
                service.source_description(),
                lookups.len()
            );
            for lookup in &lookups {
                print_records(lookup);
            }
        }
    }

    Ok(())
}

fn print_human(cli: &Cli, lookup: &SimilarFormulas) {
    if !cli.quiet {
        println!(
            "{} ({}) - {} ingredients, compared against {} formulas",
            lookup.title, lookup.formula_id, lookup.source_ingredient_count, lookup.total_compared
        );
    }

    if lookup.status == LookupStatus::NoIngredients {
        if !cli.quiet {
            println!("  No ingredients listed; nothing to compare");
        }
        return;
    }

    if lookup.results.is_empty() {
        if !cli.quiet {
            println!(
                "  No similar formulas found (min similarity {})",
                lookup.min_similarity
            );
        }
        return;
    }

    for (rank, result) in lookup.results.iter().enumerate() {
        println!(
            "  {:>2}. {:>5}  {} ({})  shared {}/{}",
            rank + 1,
            one_decimal(result.score),
            result.title,
            result.formula_id,
            result.shared_herb_count,
            result.total_herbs_in_comparison
        );
        if cli.verbose {
            for shared in &result.shared_ingredients {
                println!(
                    "        {} {}% / {}%",
                    shared.name,
                    one_decimal(shared.source_percentage),
                    one_decimal(shared.target_percentage)
                );
            }
        }
    }
}

fn print_records(lookup: &SimilarFormulas) {
    let status = match lookup.status {
        LookupStatus::Ranked => "ranked",
        LookupStatus::NoIngredients => "no_ingredients",
    };
    println!(
        "F {} \"{}\" status={} ingredients={} compared={} min={} max={} results={}",
        lookup.formula_id,
        escape_quotes(&lookup.title),
        status,
        lookup.source_ingredient_count,
        lookup.total_compared,
        lookup.min_similarity,
        lookup.max_results,
        lookup.results.len()
    );

    for result in lookup.results.iter() {
        println!(
            "R {} {} \"{}\" score={} shared={} union={}",
            lookup.formula_id,
            result.formula_id,
            escape_quotes(&result.title),
            one_decimal(result.score),
            result.shared_herb_count,
            result.total_herbs_in_comparison
        );
        for shared in &result.shared_ingredients {
            println!(
                "I {} {} \"{}\" source={} target={}",
                result.formula_id,
                shared.id,
                escape_quotes(&shared.name),
                one_decimal(shared.source_percentage),
                one_decimal(shared.target_percentage)
            );
        }
    }
}
