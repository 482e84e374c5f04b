use serde::Serialize;

use crate::formula::Ingredient;

/// An ingredient's share of its formula
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedIngredient {
    pub id: String,
    pub name: String,
    /// Share of the formula, 0-100 (unrounded)
    pub percentage: f64,
}

/// Usable weight of an ingredient; missing, negative or non-finite counts as 0
fn weight_of(ingredient: &Ingredient) -> f64 {
    ingredient
        .quantity
        .filter(|q| q.is_finite() && *q > 0.0)
        .unwrap_or(0.0)
}

/// Convert an ingredient list into percentages of the whole.
///
/// Precedence: explicit percentage > quantity ratio > equal distribution.
/// The denominator is `total_weight` when present and positive, otherwise the
/// sum of quantities. When that denominator is zero every ingredient gets an
/// equal share.
pub fn normalize(ingredients: &[Ingredient], total_weight: Option<f64>) -> Vec<NormalizedIngredient> {
    if ingredients.is_empty() {
        return Vec::new();
    }

    let denominator = match total_weight {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => ingredients.iter().map(weight_of).sum(),
    };

    if denominator == 0.0 {
        let share = 100.0 / ingredients.len() as f64;
        return ingredients
            .iter()
            .map(|i| NormalizedIngredient {
                id: i.id.clone(),
                name: i.name.clone(),
                percentage: share,
            })
            .collect();
    }

    ingredients
        .iter()
        .map(|i| {
            let percentage = match i.percentage.filter(|p| p.is_finite()) {
                Some(explicit) => explicit.clamp(0.0, 100.0),
                None => weight_of(i) / denominator * 100.0,
            };
            NormalizedIngredient {
                id: i.id.clone(),
                name: i.name.clone(),
                percentage,
            }
        })
        .collect()
}
