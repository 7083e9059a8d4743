use std::sync::Arc;

use axum::extract::FromRef;
use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateMealPlanRequest, MealPlanQuery, MealPlanResponse, UpdateMealPlanRequest},
    repo::MealPlanStore,
    repo_types::{MealPlan, NewMealPlan},
};
use crate::{
    dates::parse_date,
    error::{ensure_owner, AppError, AppResult},
    recipes::{repo::RecipeStore, services::load_owned_recipe},
    state::AppState,
};

#[derive(Clone)]
pub struct MealPlanService {
    plans: Arc<dyn MealPlanStore>,
    recipes: Arc<dyn RecipeStore>,
}

impl FromRef<AppState> for MealPlanService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.meal_plans.clone(), state.recipes.clone())
    }
}

/// Inclusive window requested by a listing query.
fn window(q: &MealPlanQuery) -> AppResult<(Date, Date)> {
    match (&q.start_date, &q.end_date, &q.date) {
        (Some(start), Some(end), _) => {
            let start = parse_date("start_date", start)?;
            let end = parse_date("end_date", end)?;
            if end < start {
                return Err(AppError::InvalidDateRange);
            }
            Ok((start, end))
        }
        (None, None, Some(day)) => {
            let day = parse_date("date", day)?;
            Ok((day, day))
        }
        _ => Err(AppError::validation(
            "either date or both start_date and end_date are required",
        )),
    }
}

impl MealPlanService {
    pub fn new(plans: Arc<dyn MealPlanStore>, recipes: Arc<dyn RecipeStore>) -> Self {
        Self { plans, recipes }
    }

    async fn load_owned(&self, id: Uuid, user_id: Uuid) -> AppResult<MealPlan> {
        let plan = self
            .plans
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("meal plan"))?;
        ensure_owner(plan.user_id, user_id)?;
        Ok(plan)
    }

    /// Reject a slot already taken by another plan of the same user.
    async fn ensure_slot_free(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: &str,
        except: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(existing) = self.plans.find_duplicate(user_id, date, meal_type).await? {
            if Some(existing.id) != except {
                warn!(%user_id, %date, meal_type, "meal slot already planned");
                return Err(AppError::Conflict(format!(
                    "a {meal_type} is already planned for {date}"
                )));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: CreateMealPlanRequest,
    ) -> AppResult<MealPlanResponse> {
        let date = parse_date("date", &req.date)?;
        let meal_type = req.meal_type.trim().to_string();
        if meal_type.is_empty() {
            return Err(AppError::validation("meal_type is required"));
        }
        if req.target_servings <= 0 {
            return Err(AppError::validation("target_servings must be greater than zero"));
        }

        let recipe = load_owned_recipe(self.recipes.as_ref(), req.recipe_id, user_id).await?;
        self.ensure_slot_free(user_id, date, &meal_type, None).await?;

        let plan = self
            .plans
            .create(NewMealPlan {
                user_id,
                recipe_id: recipe.id,
                date,
                meal_type,
                target_servings: req.target_servings,
            })
            .await?;
        info!(%user_id, meal_plan_id = %plan.id, recipe_id = %recipe.id, "meal planned");
        Ok(MealPlanResponse::from_plan(plan, recipe.name, recipe.servings))
    }

    pub async fn list(&self, user_id: Uuid, q: MealPlanQuery) -> AppResult<Vec<MealPlanResponse>> {
        let (start, end) = window(&q)?;
        let entries = self.plans.list_in_range(user_id, start, end).await?;
        Ok(entries.into_iter().map(MealPlanResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        req: UpdateMealPlanRequest,
    ) -> AppResult<MealPlanResponse> {
        let mut plan = self.load_owned(id, user_id).await?;

        let recipe_id = req.recipe_id.unwrap_or(plan.recipe_id);
        let recipe = load_owned_recipe(self.recipes.as_ref(), recipe_id, user_id).await?;
        plan.recipe_id = recipe.id;

        if let Some(date) = req.date.as_deref() {
            plan.date = parse_date("date", date)?;
        }
        let meal_type = req.meal_type.trim();
        if !meal_type.is_empty() {
            plan.meal_type = meal_type.to_string();
        }
        if req.target_servings > 0 {
            plan.target_servings = req.target_servings;
        }

        self.ensure_slot_free(user_id, plan.date, &plan.meal_type, Some(plan.id))
            .await?;
        self.plans.update(&plan).await?;
        info!(%user_id, meal_plan_id = %plan.id, "meal plan updated");
        Ok(MealPlanResponse::from_plan(plan, recipe.name, recipe.servings))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let plan = self.load_owned(id, user_id).await?;
        self.plans.delete(plan.id).await?;
        info!(%user_id, meal_plan_id = %id, "meal plan deleted");
        Ok(())
    }
}
