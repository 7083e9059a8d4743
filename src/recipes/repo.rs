use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{IngredientLine, Recipe, RecipeDetails, RecipeDraft};
use crate::{ingredients, instructions};

/// Recipe persistence as seen by the services.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn create(&self, user_id: Uuid, draft: &RecipeDraft) -> anyhow::Result<Recipe>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    async fn find_with_details(&self, id: Uuid) -> anyhow::Result<Option<RecipeDetails>>;
    /// Replace scalar fields, ingredient lines and instructions in one go.
    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
    async fn find_ingredient_lines(&self, recipe_id: Uuid) -> anyhow::Result<Vec<IngredientLine>>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn insert_children_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    draft: &RecipeDraft,
) -> anyhow::Result<()> {
    for line in &draft.ingredients {
        let ingredient_id = ingredients::repo::find_or_create_tx(tx, &line.name).await?;
        ingredients::repo::insert_line_tx(tx, recipe_id, ingredient_id, line.quantity, &line.unit)
            .await?;
    }
    for (i, text) in draft.instructions.iter().enumerate() {
        instructions::repo::insert_tx(tx, recipe_id, i as i32 + 1, text).await?;
    }
    Ok(())
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn create(&self, user_id: Uuid, draft: &RecipeDraft) -> anyhow::Result<Recipe> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, name, description, category, servings, prep_time, cook_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, description, category, servings, prep_time, cook_time,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.servings)
        .bind(draft.prep_time)
        .bind(draft.cook_time)
        .fetch_one(&mut *tx)
        .await
        .context("insert recipe")?;

        insert_children_tx(&mut tx, recipe.id, draft).await?;
        tx.commit().await.context("commit tx")?;
        Ok(recipe)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, name, description, category, servings, prep_time, cook_time,
                   created_at, updated_at
              FROM recipes
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list recipes by user")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, name, description, category, servings, prep_time, cook_time,
                   created_at, updated_at
              FROM recipes
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe")?;
        Ok(row)
    }

    async fn find_with_details(&self, id: Uuid) -> anyhow::Result<Option<RecipeDetails>> {
        let Some(recipe) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let ingredients = ingredients::repo::list_lines_by_recipe(&self.db, id).await?;
        let instructions = instructions::repo::list_by_recipe(&self.db, id).await?;
        Ok(Some(RecipeDetails {
            recipe,
            ingredients,
            instructions,
        }))
    }

    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query(
            r#"
            UPDATE recipes
               SET name = $2, description = $3, category = $4, servings = $5,
                   prep_time = $6, cook_time = $7, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.servings)
        .bind(draft.prep_time)
        .bind(draft.cook_time)
        .execute(&mut *tx)
        .await
        .context("update recipe")?;

        instructions::repo::delete_by_recipe_tx(&mut tx, id).await?;
        ingredients::repo::delete_lines_by_recipe_tx(&mut tx, id).await?;
        insert_children_tx(&mut tx, id, draft).await?;
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM recipes WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe")?;
        Ok(())
    }

    async fn find_ingredient_lines(&self, recipe_id: Uuid) -> anyhow::Result<Vec<IngredientLine>> {
        ingredients::repo::list_lines_by_recipe(&self.db, recipe_id).await
    }
}
