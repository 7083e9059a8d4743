use tracing::info;
use uuid::Uuid;

use super::{
    dto::{AddRecipeIngredientRequest, IngredientMasterResponse, RecipeIngredientResponse},
};
use crate::{
    error::{AppError, AppResult},
    recipes::{dto::IngredientResponse, services::load_owned_recipe},
    state::AppState,
};

fn normalize_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(name.to_string())
}

/// Quantity must be a finite non-negative number, unit non-blank.
fn validate_line(quantity: f64, unit: &str) -> AppResult<String> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(AppError::validation("quantity must be zero or more"));
    }
    let unit = unit.trim();
    if unit.is_empty() {
        return Err(AppError::validation("unit is required"));
    }
    Ok(unit.to_string())
}

pub async fn create_ingredient(st: &AppState, name: &str) -> AppResult<IngredientMasterResponse> {
    let name = normalize_name(name)?;
    let created = st
        .ingredients
        .create(&name)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("ingredient {name} already exists")))?;
    info!(ingredient_id = %created.id, name = %created.name, "ingredient created");
    Ok(created.into())
}

pub async fn list_ingredients(st: &AppState) -> AppResult<Vec<IngredientMasterResponse>> {
    let rows = st.ingredients.list_all().await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn add_to_recipe(
    st: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
    req: AddRecipeIngredientRequest,
) -> AppResult<RecipeIngredientResponse> {
    let unit = validate_line(req.quantity, &req.unit)?;
    load_owned_recipe(st.recipes.as_ref(), recipe_id, user_id).await?;
    let ingredient = st.ingredients.find_by_id(req.ingredient_id)
        .await?
        .ok_or(AppError::NotFound("ingredient"))?;

    let row = st
        .ingredients
        .insert_line(recipe_id, ingredient.id, req.quantity, &unit)
        .await?;
    info!(%recipe_id, line_id = %row.id, "ingredient added to recipe");
    Ok(RecipeIngredientResponse {
        id: row.id,
        recipe_id: row.recipe_id,
        ingredient_id: row.ingredient_id,
        name: ingredient.name,
        quantity: row.quantity,
        unit: row.unit,
    })
}

pub async fn list_for_recipe(
    st: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<Vec<IngredientResponse>> {
    load_owned_recipe(st.recipes.as_ref(), recipe_id, user_id).await?;
    let lines = st.recipes.find_ingredient_lines(recipe_id).await?;
    Ok(lines
        .into_iter()
        .map(|l| IngredientResponse {
            id: l.id,
            ingredient_id: l.ingredient_id,
            name: l.name,
            quantity: l.quantity,
            unit: l.unit,
        })
        .collect())
}

pub async fn remove_from_recipe(st: &AppState, line_id: Uuid, user_id: Uuid) -> AppResult<()> {
    let line = st.ingredients.find_line_by_id(line_id)
        .await?
        .ok_or(AppError::NotFound("recipe ingredient"))?;
    load_owned_recipe(st.recipes.as_ref(), line.recipe_id, user_id).await?;
    st.ingredients.delete_line(line_id).await?;
    info!(recipe_id = %line.recipe_id, %line_id, "ingredient removed from recipe");
    Ok(())
}
