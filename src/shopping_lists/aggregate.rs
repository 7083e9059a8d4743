//! Merging scaled meal-plan ingredient lines into shopping-list items.
//!
//! Lines are grouped by `(ingredient id, unit)`: the same ingredient in two
//! units stays as two items. Quantities are summed unrounded.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    meal_plans::repo_types::PlannedRecipe,
    recipes::scaling::{meal_plan_ratio, scale_lines},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

struct Accumulator {
    name: String, // first name seen for the ingredient
    quantity: f64,
}

/// Scale every plan to its target servings and sum per `(ingredient, unit)`.
/// Output is ordered by name, then unit.
pub fn aggregate(plans: &[PlannedRecipe]) -> Vec<AggregatedItem> {
    let mut merged: HashMap<(Uuid, String), Accumulator> = HashMap::new();

    for plan in plans {
        let ratio = meal_plan_ratio(plan.base_servings, plan.target_servings);
        for line in scale_lines(&plan.lines, ratio) {
            merged
                .entry((line.ingredient_id, line.unit))
                .and_modify(|acc| acc.quantity += line.quantity)
                .or_insert(Accumulator {
                    name: line.name,
                    quantity: line.quantity,
                });
        }
    }

    let mut items: Vec<AggregatedItem> = merged
        .into_iter()
        .map(|((ingredient_id, unit), acc)| AggregatedItem {
            ingredient_id,
            name: acc.name,
            quantity: acc.quantity,
            unit,
        })
        .collect();
    items.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.unit.cmp(&b.unit))
            .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::repo_types::IngredientLine;

    fn line(ingredient: u128, name: &str, quantity: f64, unit: &str) -> IngredientLine {
        IngredientLine {
            id: Uuid::new_v4(),
            ingredient_id: Uuid::from_u128(ingredient),
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    fn plan(base: i32, target: i32, lines: Vec<IngredientLine>) -> PlannedRecipe {
        PlannedRecipe {
            meal_plan_id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            base_servings: base,
            target_servings: target,
            lines,
        }
    }

    #[test]
    fn same_ingredient_and_unit_are_summed() {
        let items = aggregate(&[
            plan(1, 1, vec![line(10, "Flour", 50.0, "g")]),
            plan(1, 1, vec![line(10, "Flour", 75.0, "g"), line(10, "Flour", 1.0, "kg")]),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit, "g");
        assert_eq!(items[0].quantity, 125.0);
        assert_eq!(items[1].unit, "kg");
        assert_eq!(items[1].quantity, 1.0);
    }

    #[test]
    fn plans_are_scaled_before_merging() {
        let items = aggregate(&[
            plan(2, 4, vec![line(1, "Carrot", 4.0, "pcs")]),
            plan(4, 6, vec![line(1, "Carrot", 100.0, "pcs")]),
        ]);
        assert_eq!(items.len(), 1);
        assert!((items[0].quantity - 158.0).abs() < 1e-9);
    }

    #[test]
    fn unset_target_keeps_written_quantity() {
        let items = aggregate(&[plan(3, 0, vec![line(1, "Salt", 5.0, "g")])]);
        assert_eq!(items[0].quantity, 5.0);
    }

    #[test]
    fn zero_base_servings_scales_by_target() {
        let items = aggregate(&[plan(0, 3, vec![line(1, "Rice", 10.0, "g")])]);
        assert_eq!(items[0].quantity, 30.0);
    }

    #[test]
    fn output_is_ordered_by_name_then_unit() {
        let items = aggregate(&[plan(
            1,
            1,
            vec![
                line(3, "Tomato", 1.0, "pcs"),
                line(2, "Basil", 1.0, "g"),
                line(3, "Tomato", 200.0, "g"),
            ],
        )]);
        let order: Vec<_> = items.iter().map(|i| (i.name.as_str(), i.unit.as_str())).collect();
        assert_eq!(order, vec![("Basil", "g"), ("Tomato", "g"), ("Tomato", "pcs")]);
    }

    #[test]
    fn no_plans_no_items() {
        assert!(aggregate(&[]).is_empty());
    }
}
