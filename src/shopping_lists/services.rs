use std::sync::Arc;

use axum::extract::FromRef;
use time::Date;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    aggregate::aggregate,
    dto::{
        GenerateShoppingListRequest, ShoppingListItemResponse, ShoppingListResponse,
        ShoppingListSummaryResponse, ToggledItemResponse,
    },
    repo::ShoppingListStore,
    repo_types::ShoppingList,
};
use crate::{
    config::IngredientLoading,
    dates::{format_date, parse_date},
    error::{ensure_owner, AppError, AppResult},
    meal_plans::{repo::MealPlanStore, repo_types::PlannedRecipe},
    recipes::repo::RecipeStore,
    state::AppState,
};

#[derive(Clone)]
pub struct ShoppingListService {
    plans: Arc<dyn MealPlanStore>,
    recipes: Arc<dyn RecipeStore>,
    lists: Arc<dyn ShoppingListStore>,
    loading: IngredientLoading,
}

impl FromRef<AppState> for ShoppingListService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.meal_plans.clone(),
            state.recipes.clone(),
            state.shopping_lists.clone(),
            state.config.ingredient_loading,
        )
    }
}

impl ShoppingListService {
    pub fn new(
        plans: Arc<dyn MealPlanStore>,
        recipes: Arc<dyn RecipeStore>,
        lists: Arc<dyn ShoppingListStore>,
        loading: IngredientLoading,
    ) -> Self {
        Self {
            plans,
            recipes,
            lists,
            loading,
        }
    }

    async fn planned_recipes(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> AppResult<Vec<PlannedRecipe>> {
        match self.loading {
            IngredientLoading::Eager => Ok(self
                .plans
                .list_in_range_with_ingredients(user_id, start, end)
                .await?),
            IngredientLoading::PerPlan => {
                let entries = self.plans.list_in_range(user_id, start, end).await?;
                let mut planned = Vec::with_capacity(entries.len());
                for entry in entries {
                    let lines = self.recipes.find_ingredient_lines(entry.recipe_id).await?;
                    planned.push(PlannedRecipe {
                        meal_plan_id: entry.id,
                        recipe_id: entry.recipe_id,
                        base_servings: entry.recipe_servings,
                        target_servings: entry.target_servings,
                        lines,
                    });
                }
                Ok(planned)
            }
        }
    }

    async fn load_owned(&self, list_id: Uuid, user_id: Uuid) -> AppResult<ShoppingList> {
        let list = self
            .lists
            .find_by_id(list_id)
            .await?
            .ok_or(AppError::NotFound("shopping list"))?;
        ensure_owner(list.user_id, user_id)?;
        Ok(list)
    }

    /// Build a new list from every meal plan in `[start_date, end_date]`.
    pub async fn generate(
        &self,
        user_id: Uuid,
        req: GenerateShoppingListRequest,
    ) -> AppResult<ShoppingListResponse> {
        let start = parse_date("start_date", &req.start_date)?;
        let end = parse_date("end_date", &req.end_date)?;
        if end < start {
            return Err(AppError::InvalidDateRange);
        }

        let planned = self.planned_recipes(user_id, start, end).await?;
        let aggregated = aggregate(&planned);
        let (list, saved) = self
            .lists
            .create_with_items(user_id, start, end, &aggregated)
            .await?;
        info!(
            %user_id,
            shopping_list_id = %list.id,
            meal_plans = planned.len(),
            items = saved.len(),
            "shopping list generated"
        );

        let items = saved
            .into_iter()
            .zip(aggregated)
            .map(|(item, agg)| ShoppingListItemResponse {
                id: item.id,
                ingredient_id: item.ingredient_id,
                name: agg.name,
                quantity: item.quantity,
                unit: item.unit,
                checked: item.checked,
            })
            .collect();

        Ok(ShoppingListResponse {
            id: list.id,
            start_date: req.start_date,
            end_date: req.end_date,
            items,
        })
    }

    pub async fn get_by_id(&self, list_id: Uuid, user_id: Uuid) -> AppResult<ShoppingListResponse> {
        let list = self.load_owned(list_id, user_id).await?;
        let items = self.lists.find_items_by_list_id(list.id).await?;
        Ok(ShoppingListResponse {
            id: list.id,
            start_date: format_date(list.start_date),
            end_date: format_date(list.end_date),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn toggle_checked(&self, item_id: Uuid, user_id: Uuid) -> AppResult<ToggledItemResponse> {
        let mut item = self
            .lists
            .find_item_by_id(item_id)
            .await?
            .ok_or(AppError::NotFound("shopping list item"))?;
        self.load_owned(item.shopping_list_id, user_id).await?;

        item.checked = !item.checked;
        self.lists.update_item(&item).await?;
        debug!(%item_id, checked = item.checked, "shopping list item toggled");
        Ok(item.into())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ShoppingListSummaryResponse>> {
        let lists = self.lists.list_by_user(user_id).await?;
        Ok(lists.into_iter().map(Into::into).collect())
    }

    /// Deleting a list that is already gone succeeds.
    pub async fn delete(&self, list_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let Some(list) = self.lists.find_by_id(list_id).await? else {
            debug!(%list_id, "shopping list already absent");
            return Ok(());
        };
        ensure_owner(list.user_id, user_id)?;
        self.lists.delete(list.id).await?;
        info!(%user_id, shopping_list_id = %list_id, "shopping list deleted");
        Ok(())
    }
}
