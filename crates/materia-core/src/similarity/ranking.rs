use std::time::Instant;

use super::scoring::score;
use super::{RankOptions, SimilarityResult};
use crate::formula::Formula;
use crate::trace_time;

/// Rank candidates by similarity to `source`.
///
/// The source itself (by id) is never a candidate. A candidate qualifies when
/// its score reaches `min_similarity` and it shares at least one ingredient.
/// Results are sorted by descending score, ties keep pool order.
pub fn find_similar(
    source: &Formula,
    candidates: &[Formula],
    options: &RankOptions,
) -> Vec<SimilarityResult> {
    let start = Instant::now();

    let mut results: Vec<SimilarityResult> = candidates
        .iter()
        .filter(|candidate| candidate.id != source.id)
        .filter_map(|candidate| {
            let pair = score(
                &source.ingredients,
                source.total_weight,
                &candidate.ingredients,
                candidate.total_weight,
            );

            if pair.score < options.min_similarity || pair.shared_ingredients.is_empty() {
                return None;
            }

            Some(SimilarityResult {
                formula_id: candidate.id.clone(),
                title: candidate.title.clone(),
                score: pair.score,
                shared_herb_count: pair.shared_count(),
                total_herbs_in_comparison: pair.union_count,
                shared_ingredients: pair.shared_ingredients,
            })
        })
        .collect();

    let qualified = results.len();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(options.max_results);

    trace_time!(
        start,
        "find_similar",
        source_id = source.id.as_str(),
        candidates = candidates.len(),
        qualified = qualified
    );

    results
}
