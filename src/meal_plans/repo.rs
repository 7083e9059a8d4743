use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::{MealPlan, MealPlanEntry, NewMealPlan, PlannedRecipe};
use crate::recipes::repo_types::IngredientLine;

#[async_trait]
pub trait MealPlanStore: Send + Sync {
    async fn create(&self, new: NewMealPlan) -> anyhow::Result<MealPlan>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealPlan>>;
    async fn find_duplicate(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: &str,
    ) -> anyhow::Result<Option<MealPlan>>;
    /// Plans with `start <= date <= end`, oldest first.
    async fn list_in_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>>;
    /// Same window, with every plan's recipe ingredient lines loaded in one query.
    async fn list_in_range_with_ingredients(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedRecipe>>;
    async fn update(&self, plan: &MealPlan) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgMealPlanStore {
    db: PgPool,
}

impl PgMealPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct PlannedLineRow {
    meal_plan_id: Uuid,
    recipe_id: Uuid,
    base_servings: i32,
    target_servings: i32,
    line_id: Option<Uuid>,
    ingredient_id: Option<Uuid>,
    ingredient_name: Option<String>,
    quantity: Option<f64>,
    unit: Option<String>,
}

/// Fold the joined rows (ordered by plan) back into one entry per plan.
fn group_planned_rows(rows: Vec<PlannedLineRow>) -> Vec<PlannedRecipe> {
    let mut out: Vec<PlannedRecipe> = Vec::new();
    for row in rows {
        let starts_new = out
            .last()
            .map_or(true, |p| p.meal_plan_id != row.meal_plan_id);
        if starts_new {
            out.push(PlannedRecipe {
                meal_plan_id: row.meal_plan_id,
                recipe_id: row.recipe_id,
                base_servings: row.base_servings,
                target_servings: row.target_servings,
                lines: Vec::new(),
            });
        }
        // LEFT JOIN: a recipe without lines yields one row of NULLs.
        if let (Some(id), Some(ingredient_id), Some(quantity), Some(unit)) =
            (row.line_id, row.ingredient_id, row.quantity, row.unit)
        {
            if let Some(plan) = out.last_mut() {
                plan.lines.push(IngredientLine {
                    id,
                    ingredient_id,
                    name: row.ingredient_name.unwrap_or_else(|| "Unknown".to_string()),
                    quantity,
                    unit,
                });
            }
        }
    }
    out
}

#[async_trait]
impl MealPlanStore for PgMealPlanStore {
    async fn create(&self, new: NewMealPlan) -> anyhow::Result<MealPlan> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans (user_id, recipe_id, date, meal_type, target_servings)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, recipe_id, date, meal_type, target_servings, created_at, updated_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.recipe_id)
        .bind(new.date)
        .bind(&new.meal_type)
        .bind(new.target_servings)
        .fetch_one(&self.db)
        .await
        .context("insert meal plan")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, recipe_id, date, meal_type, target_servings, created_at, updated_at
              FROM meal_plans
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find meal plan")?;
        Ok(row)
    }

    async fn find_duplicate(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: &str,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, recipe_id, date, meal_type, target_servings, created_at, updated_at
              FROM meal_plans
             WHERE user_id = $1 AND date = $2 AND meal_type = $3
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type)
        .fetch_optional(&self.db)
        .await
        .context("find duplicate meal plan")?;
        Ok(row)
    }

    async fn list_in_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>> {
        let rows = sqlx::query_as::<_, MealPlanEntry>(
            r#"
            SELECT mp.id, mp.recipe_id, r.name AS recipe_name,
                   r.servings AS recipe_servings, mp.date, mp.meal_type, mp.target_servings
              FROM meal_plans mp
              JOIN recipes r ON r.id = mp.recipe_id
             WHERE mp.user_id = $1 AND mp.date BETWEEN $2 AND $3
             ORDER BY mp.date ASC, mp.meal_type ASC, mp.id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list meal plans in range")?;
        Ok(rows)
    }

    async fn list_in_range_with_ingredients(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedRecipe>> {
        let rows = sqlx::query_as::<_, PlannedLineRow>(
            r#"
            SELECT mp.id AS meal_plan_id, mp.recipe_id, r.servings AS base_servings,
                   mp.target_servings, ri.id AS line_id, ri.ingredient_id,
                   i.name AS ingredient_name, ri.quantity, ri.unit
              FROM meal_plans mp
              JOIN recipes r ON r.id = mp.recipe_id
              LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
              LEFT JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE mp.user_id = $1 AND mp.date BETWEEN $2 AND $3
             ORDER BY mp.date ASC, mp.id ASC, ri.created_at ASC, ri.id ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list planned recipes with ingredient lines")?;
        Ok(group_planned_rows(rows))
    }

    async fn update(&self, plan: &MealPlan) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE meal_plans
               SET recipe_id = $2, date = $3, meal_type = $4, target_servings = $5,
                   updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(plan.id)
        .bind(plan.recipe_id)
        .bind(plan.date)
        .bind(&plan.meal_type)
        .bind(plan.target_servings)
        .execute(&self.db)
        .await
        .context("update meal plan")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM meal_plans WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete meal plan")?;
        Ok(())
    }
}
