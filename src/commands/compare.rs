//! `materia compare` command - score one formula against another

use crate::cli::{Cli, OutputFormat};
use materia_core::error::Result;
use materia_core::format::{escape_quotes, one_decimal};
use materia_core::service::SimilarityService;
use materia_core::similarity::score;

/// Execute the compare command
pub fn execute(cli: &Cli, service: &SimilarityService, a: &str, b: &str) -> Result<()> {
    let source = service.formula(a)?;
    let target = service.formula(b)?;

    let pair = score(
        &source.ingredients,
        source.total_weight,
        &target.ingredients,
        target.total_weight,
    );

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": { "id": source.id, "title": source.title },
                "target": { "id": target.id, "title": target.title },
                "score": pair.score,
                "jaccard": pair.jaccard,
                "weighted": pair.weighted,
                "shared_herb_count": pair.shared_count(),
                "total_herbs_in_comparison": pair.union_count,
                "shared_ingredients": pair.shared_ingredients,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!(
                "{} ({}) vs {} ({}): {}",
                source.title,
                source.id,
                target.title,
                target.id,
                one_decimal(pair.score)
            );
            if !cli.quiet {
                println!(
                    "  overlap {:.3}  proportion {:.3}  shared {}/{}",
                    pair.jaccard,
                    pair.weighted,
                    pair.shared_count(),
                    pair.union_count
                );
                for shared in &pair.shared_ingredients {
                    println!(
                        "  {:<24} {:>5}% {:>5}%",
                        shared.name,
                        one_decimal(shared.source_percentage),
                        one_decimal(shared.target_percentage)
                    );
                }
            }
        }
        OutputFormat::Records => {
            println!(
                "H materia=1 records=1 source={} mode=compare",
                service.source_description()
            );
            println!(
                "R {} {} \"{}\" score={} jaccard={:.3} weighted={:.3} shared={} union={}",
                source.id,
                target.id,
                escape_quotes(&target.title),
                one_decimal(pair.score),
                pair.jaccard,
                pair.weighted,
                pair.shared_count(),
                pair.union_count
            );
            for shared in &pair.shared_ingredients {
                println!(
                    "I {} {} \"{}\" source={} target={}",
                    target.id,
                    shared.id,
                    escape_quotes(&shared.name),
                    one_decimal(shared.source_percentage),
                    one_decimal(shared.target_percentage)
                );
            }
        }
    }

    Ok(())
}
