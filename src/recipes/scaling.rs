//! Serving-count scaling of recipe ingredient lines.
//!
//! Quantities are multiplied by `target / base` and returned unrounded. Units and
//! ingredient identity pass through untouched; no unit conversion happens here.

use serde::Serialize;
use uuid::Uuid;

use super::repo_types::IngredientLine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledLine {
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// `target / base`. A non-positive base is a data-integrity violation and is
/// treated as 1.
pub fn scaling_ratio(base_servings: i32, target_servings: i32) -> f64 {
    let base = if base_servings <= 0 { 1 } else { base_servings };
    f64::from(target_servings) / f64::from(base)
}

/// Ratio for a meal plan. An unset (non-positive) target means "as written".
pub fn meal_plan_ratio(base_servings: i32, target_servings: i32) -> f64 {
    if target_servings <= 0 {
        return 1.0;
    }
    scaling_ratio(base_servings, target_servings)
}

pub fn scale_lines(lines: &[IngredientLine], ratio: f64) -> Vec<ScaledLine> {
    lines
        .iter()
        .map(|line| ScaledLine {
            ingredient_id: line.ingredient_id,
            name: line.name.clone(),
            quantity: line.quantity * ratio,
            unit: line.unit.clone(),
        })
        .collect()
}
