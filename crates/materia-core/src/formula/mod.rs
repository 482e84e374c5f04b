//! Formula and ingredient model
//!
//! Content arrives in loosely shaped JSON (see [`raw`]); it is resolved once
//! into these canonical types and everything downstream works on them.

pub mod raw;

use serde::{Deserialize, Serialize};

pub use raw::{parse_formula_pool, RawFormula, RawIngredient, RawIngredientList};

/// A single component of a formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Stable identifier, unique within a formula
    pub id: String,
    /// Display name
    pub name: String,
    /// Absolute quantity (nonnegative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Unit of measure for `quantity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Explicit share of the formula (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Role or classification tag (e.g. chief, deputy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: None,
            unit: None,
            percentage: None,
            role: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A named collection of ingredients, the unit of comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Normalization denominator when present and nonzero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
}

impl Formula {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ingredients: Vec::new(),
            total_weight: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_total_weight(mut self, total_weight: f64) -> Self {
        self.total_weight = Some(total_weight);
        self
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }
}

/// Find a formula in a pool by id
pub fn find_formula<'a>(pool: &'a [Formula], id: &str) -> Option<&'a Formula> {
    pool.iter().find(|f| f.id == id)
}
