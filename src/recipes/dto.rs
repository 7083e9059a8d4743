use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{DraftIngredient, Recipe, RecipeDetails, RecipeDraft};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RecipeIngredientInput {
    pub name: String,
    #[serde(alias = "quantity")]
    pub amount: f64,
    pub unit: String,
}

/// Body of `POST /recipes` and `PUT /recipes/:id`.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub servings: i32,
    #[serde(default)]
    pub prep_time: i32,
    #[serde(default)]
    pub cook_time: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientInput>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = AppError;

    fn try_from(req: RecipeRequest) -> Result<Self, Self::Error> {
        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if req.servings <= 0 {
            return Err(AppError::validation("servings must be greater than zero"));
        }
        if req.prep_time < 0 || req.cook_time < 0 {
            return Err(AppError::validation("prep_time and cook_time must not be negative"));
        }

        let mut ingredients = Vec::with_capacity(req.ingredients.len());
        for ing in req.ingredients {
            let name = ing.name.trim().to_string();
            let unit = ing.unit.trim().to_string();
            if name.is_empty() || unit.is_empty() {
                return Err(AppError::validation("ingredient name and unit are required"));
            }
            if !ing.amount.is_finite() || ing.amount < 0.0 {
                return Err(AppError::validation(format!(
                    "quantity of {name} must be zero or more"
                )));
            }
            ingredients.push(DraftIngredient {
                name,
                quantity: ing.amount,
                unit,
            });
        }

        let instructions = req
            .instructions
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(RecipeDraft {
            name,
            description: req.description.trim().to_string(),
            category: req.category.trim().to_string(),
            servings: req.servings,
            prep_time: req.prep_time,
            cook_time: req.cook_time,
            ingredients,
            instructions,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRecipeResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub servings: i32,
    pub total_time: i32,
    pub category: String,
}

impl From<Recipe> for RecipeSummary {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            total_time: r.total_time(),
            name: r.name,
            description: r.description,
            servings: r.servings,
            category: r.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct InstructionResponse {
    pub id: Uuid,
    pub step_number: i32,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub servings: i32,
    pub category: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub ingredients: Vec<IngredientResponse>,
    pub instructions: Vec<InstructionResponse>,
}

impl From<RecipeDetails> for RecipeDetailResponse {
    fn from(d: RecipeDetails) -> Self {
        let RecipeDetails {
            recipe,
            ingredients,
            instructions,
        } = d;
        Self {
            id: recipe.id,
            total_time: recipe.total_time(),
            name: recipe.name,
            description: recipe.description,
            servings: recipe.servings,
            category: recipe.category,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            ingredients: ingredients
                .into_iter()
                .map(|l| IngredientResponse {
                    id: l.id,
                    ingredient_id: l.ingredient_id,
                    name: l.name,
                    quantity: l.quantity,
                    unit: l.unit,
                })
                .collect(),
            instructions: instructions
                .into_iter()
                .map(|i| InstructionResponse {
                    id: i.id,
                    step_number: i.step_number,
                    text: i.text,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScaleQuery {
    pub servings: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ScaledIngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct ScaledRecipeResponse {
    pub recipe_id: Uuid,
    pub name: String,
    pub original_servings: i32,
    pub scaled_servings: i32,
    pub ingredients: Vec<ScaledIngredientResponse>,
}
