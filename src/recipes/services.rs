use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{
        RecipeDetailResponse, RecipeRequest, RecipeSummary, ScaledIngredientResponse,
        ScaledRecipeResponse,
    },
    repo::RecipeStore,
    repo_types::{Recipe, RecipeDraft},
    scaling::{scale_lines, scaling_ratio},
};
use crate::{
    error::{ensure_owner, AppError, AppResult},
    state::AppState,
};

/// Load a recipe and check that `user_id` owns it.
pub async fn load_owned_recipe(
    store: &dyn RecipeStore,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<Recipe> {
    let recipe = store
        .find_by_id(recipe_id)
        .await?
        .ok_or(AppError::NotFound("recipe"))?;
    ensure_owner(recipe.user_id, user_id)?;
    Ok(recipe)
}

#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeStore>,
}

impl FromRef<AppState> for RecipeService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.recipes.clone())
    }
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeStore>) -> Self {
        Self { recipes }
    }

    pub async fn create(&self, user_id: Uuid, req: RecipeRequest) -> AppResult<Uuid> {
        let draft = RecipeDraft::try_from(req)?;
        let recipe = self.recipes.create(user_id, &draft).await?;
        info!(%user_id, recipe_id = %recipe.id, "recipe created");
        Ok(recipe.id)
    }

    pub async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<RecipeSummary>> {
        let recipes = self.recipes.list_by_user(user_id).await?;
        Ok(recipes.into_iter().map(RecipeSummary::from).collect())
    }

    pub async fn get(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<RecipeDetailResponse> {
        let details = self
            .recipes
            .find_with_details(recipe_id)
            .await?
            .ok_or(AppError::NotFound("recipe"))?;
        ensure_owner(details.recipe.user_id, user_id)?;
        Ok(details.into())
    }

    pub async fn update(&self, recipe_id: Uuid, user_id: Uuid, req: RecipeRequest) -> AppResult<()> {
        let draft = RecipeDraft::try_from(req)?;
        load_owned_recipe(self.recipes.as_ref(), recipe_id, user_id).await?;
        self.recipes.update(recipe_id, &draft).await?;
        info!(%user_id, %recipe_id, "recipe updated");
        Ok(())
    }

    pub async fn delete(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()> {
        load_owned_recipe(self.recipes.as_ref(), recipe_id, user_id).await?;
        self.recipes.delete(recipe_id).await?;
        info!(%user_id, %recipe_id, "recipe deleted");
        Ok(())
    }

    /// Ingredient quantities of one recipe rescaled to `servings`.
    pub async fn scale(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        servings: i32,
    ) -> AppResult<ScaledRecipeResponse> {
        if servings <= 0 {
            warn!(%recipe_id, servings, "rejecting non-positive scale target");
            return Err(AppError::validation("servings must be greater than zero"));
        }

        let details = self
            .recipes
            .find_with_details(recipe_id)
            .await?
            .ok_or(AppError::NotFound("recipe"))?;
        ensure_owner(details.recipe.user_id, user_id)?;

        let ratio = scaling_ratio(details.recipe.servings, servings);
        let ingredients = scale_lines(&details.ingredients, ratio)
            .into_iter()
            .map(|l| ScaledIngredientResponse {
                id: l.ingredient_id,
                name: l.name,
                quantity: l.quantity,
                unit: l.unit,
            })
            .collect();

        Ok(ScaledRecipeResponse {
            recipe_id: details.recipe.id,
            name: details.recipe.name,
            original_servings: details.recipe.servings,
            scaled_servings: servings,
            ingredients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> RecipeService {
        RecipeService::new(store.clone())
    }

    fn soup_request() -> RecipeRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Soup",
            "servings": 2,
            "prep_time": 10,
            "cook_time": 20,
            "ingredients": [
                { "name": "Carrot", "amount": 4, "unit": "pcs" },
                { "name": "Water", "amount": 1.5, "unit": "l" }
            ],
            "instructions": ["Chop carrots", "Boil"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_lines_and_ordered_steps() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = Uuid::new_v4();

        let id = svc.create(user, soup_request()).await.unwrap();
        let detail = svc.get(id, user).await.unwrap();

        assert_eq!(detail.name, "Soup");
        assert_eq!(detail.total_time, 30);
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.instructions[0].step_number, 1);
        assert_eq!(detail.instructions[1].text, "Boil");
    }

    #[tokio::test]
    async fn get_by_other_user_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let id = svc.create(Uuid::new_v4(), soup_request()).await.unwrap();

        let err = svc.get(id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn missing_recipe_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = service(&store)
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("recipe")));
    }

    #[tokio::test]
    async fn scale_doubles_quantities() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = Uuid::new_v4();
        let id = svc.create(user, soup_request()).await.unwrap();

        let scaled = svc.scale(id, user, 4).await.unwrap();
        assert_eq!(scaled.original_servings, 2);
        assert_eq!(scaled.scaled_servings, 4);
        let carrot = scaled.ingredients.iter().find(|i| i.name == "Carrot").unwrap();
        assert!((carrot.quantity - 8.0).abs() < 1e-9);
        assert_eq!(carrot.unit, "pcs");
    }

    #[tokio::test]
    async fn scale_rejects_non_positive_target_before_loading() {
        let store = Arc::new(InMemoryStore::new());
        let err = service(&store)
            .scale(Uuid::new_v4(), Uuid::new_v4(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_replaces_lines_and_steps() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = Uuid::new_v4();
        let id = svc.create(user, soup_request()).await.unwrap();

        let req: RecipeRequest = serde_json::from_value(serde_json::json!({
            "name": "Carrot soup",
            "servings": 3,
            "ingredients": [{ "name": "Carrot", "amount": 6, "unit": "pcs" }],
            "instructions": ["Blend"]
        }))
        .unwrap();
        svc.update(id, user, req).await.unwrap();

        let detail = svc.get(id, user).await.unwrap();
        assert_eq!(detail.name, "Carrot soup");
        assert_eq!(detail.servings, 3);
        assert_eq!(detail.ingredients.len(), 1);
        assert_eq!(detail.instructions.len(), 1);
    }
}
