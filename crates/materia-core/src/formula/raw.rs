//! Raw content shapes and their resolution into canonical formulas
//!
//! The content API is loose about ingredient shapes: a bare string, a
//! `{ "value": ... }` wrapper, or a full object whose numeric fields may be
//! numbers, numeric strings or wrapped again. All of that is modelled here and
//! resolved in one pass; nothing past this module sees a `serde_json::Value`.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::{Formula, Ingredient};
use crate::error::{MateriaError, Result};

/// One ingredient as it arrives from the content store
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIngredient {
    /// `"ginger"` or `42`
    Scalar(Scalar),
    /// `{ "value": <raw ingredient> }`
    Wrapped(ValueWrapper),
    /// A full ingredient object
    Full(Box<RawIngredientFields>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueWrapper {
    pub value: Box<RawIngredient>,
}

/// Ingredient object fields, all optional and loosely typed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIngredientFields {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "title")]
    pub name: Option<Value>,
    #[serde(default, alias = "amount")]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit: Option<Value>,
    #[serde(default, alias = "percent")]
    pub percentage: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
    /// Related herb record carrying the identity
    #[serde(default)]
    pub herb: Option<RawIngredient>,
}

/// The ingredient collection of a formula
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIngredientList {
    Items(Vec<Value>),
    Wrapped {
        #[serde(alias = "data")]
        value: Box<RawIngredientList>,
    },
    Single(Value),
}

/// One formula as it arrives from the content store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormula {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "name")]
    pub title: Option<Value>,
    #[serde(default)]
    pub ingredients: Option<RawIngredientList>,
    #[serde(default, alias = "totalWeight")]
    pub total_weight: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoolDocument {
    Items(Vec<Value>),
    Envelope { data: Vec<Value> },
}

/// Read text out of a loosely typed field
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("value").and_then(text_of),
        _ => None,
    }
}

/// Read a finite number out of a loosely typed field
fn number_of(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("value").and_then(number_of),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Derive an identifier from a display name
fn id_from_name(name: &str) -> String {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        name.to_string()
    } else {
        slug
    }
}

fn scalar_text(scalar: &Scalar) -> Option<String> {
    match scalar {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Scalar::Number(n) if n.is_finite() => Some(n.to_string()),
        Scalar::Number(_) => None,
    }
}

impl RawIngredient {
    /// Resolve into a canonical ingredient, or `None` when neither an id nor
    /// a name can be found
    pub fn resolve(&self) -> Option<Ingredient> {
        match self {
            RawIngredient::Scalar(scalar) => {
                let text = scalar_text(scalar)?;
                Some(Ingredient::new(text.clone(), text))
            }
            RawIngredient::Wrapped(wrapper) => wrapper.value.resolve(),
            RawIngredient::Full(fields) => fields.resolve(),
        }
    }
}

impl RawIngredientFields {
    fn resolve(&self) -> Option<Ingredient> {
        let herb = self.herb.as_ref().and_then(RawIngredient::resolve);

        let explicit_id = self.id.as_ref().and_then(text_of);
        let explicit_name = self.name.as_ref().and_then(text_of);

        let id = explicit_id
            .or_else(|| herb.as_ref().map(|h| h.id.clone()))
            .or_else(|| explicit_name.as_deref().map(id_from_name))?;
        let name = explicit_name
            .or_else(|| herb.as_ref().map(|h| h.name.clone()))
            .unwrap_or_else(|| id.clone());

        Some(Ingredient {
            id,
            name,
            quantity: self
                .quantity
                .as_ref()
                .and_then(number_of)
                .filter(|q| *q >= 0.0),
            unit: self.unit.as_ref().and_then(text_of),
            percentage: self
                .percentage
                .as_ref()
                .and_then(number_of)
                .map(|p| p.clamp(0.0, 100.0)),
            role: self.role.as_ref().and_then(text_of),
        })
    }
}

fn resolve_item(item: &Value) -> Option<Ingredient> {
    // serde would read an array positionally into the object shapes
    if item.is_array() {
        tracing::debug!("skipping array-shaped ingredient");
        return None;
    }
    match serde_json::from_value::<RawIngredient>(item.clone()) {
        Ok(raw) => raw.resolve(),
        Err(e) => {
            tracing::debug!(error = %e, "skipping unrecognized ingredient shape");
            None
        }
    }
}

impl RawIngredientList {
    /// Resolve every recognizable ingredient, keeping the first entry for any
    /// repeated id
    pub fn resolve(&self) -> Vec<Ingredient> {
        let mut resolved = Vec::new();
        self.collect_into(&mut resolved);

        let mut seen = HashSet::new();
        resolved.retain(|ingredient| {
            let fresh = seen.insert(ingredient.id.clone());
            if !fresh {
                tracing::debug!(ingredient_id = %ingredient.id, "dropping repeated ingredient");
            }
            fresh
        });
        resolved
    }

    fn collect_into(&self, out: &mut Vec<Ingredient>) {
        match self {
            RawIngredientList::Items(items) => out.extend(items.iter().filter_map(resolve_item)),
            RawIngredientList::Wrapped { value } => value.collect_into(out),
            RawIngredientList::Single(Value::Null) => {}
            RawIngredientList::Single(item) => out.extend(resolve_item(item)),
        }
    }
}

impl RawFormula {
    /// Resolve into a canonical formula, or `None` without an id or title
    pub fn resolve(&self) -> Option<Formula> {
        let explicit_title = self.title.as_ref().and_then(text_of);
        let id = self
            .id
            .as_ref()
            .and_then(text_of)
            .or_else(|| explicit_title.as_deref().map(id_from_name))?;
        let title = explicit_title.unwrap_or_else(|| id.clone());

        Some(Formula {
            id,
            title,
            ingredients: self
                .ingredients
                .as_ref()
                .map(RawIngredientList::resolve)
                .unwrap_or_default(),
            total_weight: self
                .total_weight
                .as_ref()
                .and_then(number_of)
                .filter(|w| *w > 0.0),
        })
    }
}

/// Parse a content document into formulas.
///
/// Accepts a bare array or a `{ "data": [...] }` envelope. Entries that are
/// not objects or lack both an id and a title are skipped.
pub fn parse_formula_pool(json: &str, source_name: &str) -> Result<Vec<Formula>> {
    let document: PoolDocument = serde_json::from_str(json)
        .map_err(|e| MateriaError::invalid_content(source_name, e))?;

    let entries = match document {
        PoolDocument::Items(items) => items,
        PoolDocument::Envelope { data } => data,
    };

    let total = entries.len();
    let formulas: Vec<Formula> = entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| match serde_json::from_value::<RawFormula>(entry) {
            Ok(raw) => raw.resolve(),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unrecognized formula entry");
                None
            }
        })
        .collect();

    if formulas.len() < total {
        tracing::warn!(
            source = source_name,
            skipped = total - formulas.len(),
            "some formula entries could not be resolved"
        );
    }

    Ok(formulas)
}
