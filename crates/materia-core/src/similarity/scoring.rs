//! Pairwise formula scoring
//!
//! The composite score blends set overlap (Jaccard over ingredient ids) with
//! proportion similarity (cosine over the percentages of shared ingredients).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::normalize::{normalize, NormalizedIngredient};
use super::{round1, PROPORTION_WEIGHT, SET_OVERLAP_WEIGHT};
use crate::formula::Ingredient;

/// An ingredient present in both formulas of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedIngredient {
    pub id: String,
    pub name: String,
    /// Percentage in the source formula, one decimal
    pub source_percentage: f64,
    /// Percentage in the target formula, one decimal
    pub target_percentage: f64,
}

/// Outcome of scoring one pair of formulas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    /// Composite score 0-100, one decimal
    pub score: f64,
    /// Set-overlap component, 0-1 (unrounded)
    pub jaccard: f64,
    /// Proportion-weighted component, 0-1 (unrounded)
    pub weighted: f64,
    /// Size of the union of ingredient ids
    pub union_count: usize,
    /// Shared ingredients, most emphasized in the source first
    pub shared_ingredients: Vec<SharedIngredient>,
}

impl PairScore {
    fn empty() -> Self {
        Self {
            score: 0.0,
            jaccard: 0.0,
            weighted: 0.0,
            union_count: 0,
            shared_ingredients: Vec::new(),
        }
    }

    pub fn shared_count(&self) -> usize {
        self.shared_ingredients.len()
    }
}

/// Map id -> normalized entry, first occurrence wins for repeated ids
fn by_id(normalized: &[NormalizedIngredient]) -> HashMap<&str, &NormalizedIngredient> {
    let mut map = HashMap::with_capacity(normalized.len());
    for n in normalized {
        map.entry(n.id.as_str()).or_insert(n);
    }
    map
}

/// Cosine similarity over paired percentages; 0 when either side is all
/// zero or not finite
fn cosine(pairs: &[(f64, f64)]) -> f64 {
    // scale invariant, so divide by the largest component to keep squares finite
    let max_a = pairs.iter().map(|(a, _)| a.abs()).fold(0.0, f64::max);
    let max_b = pairs.iter().map(|(_, b)| b.abs()).fold(0.0, f64::max);
    if max_a == 0.0 || max_b == 0.0 || !max_a.is_finite() || !max_b.is_finite() {
        return 0.0;
    }

    let scaled: Vec<(f64, f64)> = pairs.iter().map(|(a, b)| (a / max_a, b / max_b)).collect();
    let dot: f64 = scaled.iter().map(|(a, b)| a * b).sum();
    let mag_a = scaled.iter().map(|(a, _)| a * a).sum::<f64>().sqrt();
    let mag_b = scaled.iter().map(|(_, b)| b * b).sum::<f64>().sqrt();

    let cosine = dot / (mag_a * mag_b);
    if cosine.is_finite() {
        cosine.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Score a source ingredient list against a target ingredient list.
///
/// Either list being empty yields a zero score with no shared ingredients.
pub fn score(
    source: &[Ingredient],
    source_total_weight: Option<f64>,
    target: &[Ingredient],
    target_total_weight: Option<f64>,
) -> PairScore {
    if source.is_empty() || target.is_empty() {
        return PairScore::empty();
    }

    let source_norm = normalize(source, source_total_weight);
    let target_norm = normalize(target, target_total_weight);
    let source_map = by_id(&source_norm);
    let target_map = by_id(&target_norm);

    let source_ids: HashSet<&str> = source_map.keys().copied().collect();
    let target_ids: HashSet<&str> = target_map.keys().copied().collect();
    let union_count = source_ids.union(&target_ids).count();

    // walk the source in list order so equal percentages keep a stable order
    let mut seen = HashSet::new();
    let shared: Vec<(&NormalizedIngredient, &NormalizedIngredient)> = source_norm
        .iter()
        .filter(|s| seen.insert(s.id.as_str()))
        .filter_map(|s| target_map.get(s.id.as_str()).map(|t| (s, *t)))
        .collect();

    let jaccard = if union_count == 0 {
        0.0
    } else {
        shared.len() as f64 / union_count as f64
    };

    let pairs: Vec<(f64, f64)> = shared
        .iter()
        .map(|(s, t)| (s.percentage, t.percentage))
        .collect();
    let weighted = cosine(&pairs);

    let composite = (jaccard * SET_OVERLAP_WEIGHT + weighted * PROPORTION_WEIGHT) * 100.0;
    let composite = if composite.is_finite() {
        composite.clamp(0.0, 100.0)
    } else {
        0.0
    };

    // order on exact percentages; rounding would turn near-ties into ties
    let mut ordered = shared;
    ordered.sort_by(|(a, _), (b, _)| b.percentage.total_cmp(&a.percentage));

    let shared_ingredients: Vec<SharedIngredient> = ordered
        .iter()
        .map(|(s, t)| SharedIngredient {
            id: s.id.clone(),
            name: s.name.clone(),
            source_percentage: round1(s.percentage),
            target_percentage: round1(t.percentage),
        })
        .collect();

    PairScore {
        score: round1(composite),
        jaccard,
        weighted,
        union_count,
        shared_ingredients,
    }
}
