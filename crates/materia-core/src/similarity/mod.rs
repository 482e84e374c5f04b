//! Similarity engine for finding related formulas

mod normalize;

mod scoring;

mod ranking;

pub use normalize::{normalize, NormalizedIngredient};
pub use ranking::find_similar;
pub use scoring::{score, PairScore, SharedIngredient};

use serde::{Deserialize, Serialize};

use crate::formula::{find_formula, Formula};

/// Weight of the set-overlap (Jaccard) component in the composite score
pub const SET_OVERLAP_WEIGHT: f64 = 0.5;

/// Weight of the proportion (cosine) component in the composite score
pub const PROPORTION_WEIGHT: f64 = 0.5;

/// Default minimum composite score for a candidate to be ranked
pub const DEFAULT_MIN_SIMILARITY: f64 = 10.0;

/// Default number of ranked results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Minimum composite score (0-100) to include a candidate
    pub min_similarity: f64,
    /// Maximum number of results
    pub max_results: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl RankOptions {
    pub fn new(min_similarity: f64, max_results: usize) -> Self {
        Self {
            min_similarity,
            max_results,
        }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Target formula id
    pub formula_id: String,
    /// Target formula title
    pub title: String,
    /// Composite score 0-100, one decimal
    pub score: f64,
    pub shared_herb_count: usize,
    /// Size of the union of ingredient ids across both formulas
    pub total_herbs_in_comparison: usize,
    /// Shared ingredients, most emphasized in the source first
    pub shared_ingredients: Vec<SharedIngredient>,
}

/// Similarity Engine over a loaded formula pool
pub struct SimilarityEngine<'a> {
    pool: &'a [Formula],
}

impl<'a> SimilarityEngine<'a> {
    /// Create a new Similarity Engine
    pub fn new(pool: &'a [Formula]) -> Self {
        SimilarityEngine { pool }
    }

    /// Score two formulas of the pool by id; `None` if either id is unknown
    pub fn calculate_similarity(&self, id_a: &str, id_b: &str) -> Option<PairScore> {
        let a = find_formula(self.pool, id_a)?;
        let b = find_formula(self.pool, id_b)?;
        Some(score(
            &a.ingredients,
            a.total_weight,
            &b.ingredients,
            b.total_weight,
        ))
    }

    /// Get the top similar formulas for a formula of the pool
    pub fn find_similar(&self, formula_id: &str, options: &RankOptions) -> Vec<SimilarityResult> {
        match find_formula(self.pool, formula_id) {
            Some(source) => find_similar(source, self.pool, options),
            None => Vec::new(),
        }
    }
}
