use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{Ingredient, RecipeIngredientRow};
use crate::recipes::repo_types::IngredientLine;

/// Master ingredients and single recipe lines.
#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// Returns `None` when the name is already taken.
    async fn create(&self, name: &str) -> anyhow::Result<Option<Ingredient>>;
    async fn list_all(&self) -> anyhow::Result<Vec<Ingredient>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ingredient>>;
    async fn insert_line(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<RecipeIngredientRow>;
    async fn find_line_by_id(&self, id: Uuid) -> anyhow::Result<Option<RecipeIngredientRow>>;
    async fn delete_line(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgIngredientStore {
    db: PgPool,
}

impl PgIngredientStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientStore for PgIngredientStore {
    async fn create(&self, name: &str) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("insert ingredient")?;
        Ok(row)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, name, created_at FROM ingredients ORDER BY name ASC"#,
        )
        .fetch_all(&self.db)
        .await
        .context("list ingredients")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, name, created_at FROM ingredients WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find ingredient")?;
        Ok(row)
    }

    async fn insert_line(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<RecipeIngredientRow> {
        let row = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, recipe_id, ingredient_id, quantity, unit
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(quantity)
        .bind(unit)
        .fetch_one(&self.db)
        .await
        .context("insert recipe ingredient")?;
        Ok(row)
    }

    async fn find_line_by_id(&self, id: Uuid) -> anyhow::Result<Option<RecipeIngredientRow>> {
        let row = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT id, recipe_id, ingredient_id, quantity, unit
              FROM recipe_ingredients
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe ingredient")?;
        Ok(row)
    }

    async fn delete_line(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM recipe_ingredients WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe ingredient")?;
        Ok(())
    }
}

/// Resolve an ingredient by name inside a transaction, creating it on first use.
pub async fn find_or_create_tx(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> anyhow::Result<Uuid> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let (id,) = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO ingredients (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
    .with_context(|| format!("find or create ingredient {name}"))?;
    Ok(id)
}

pub async fn list_lines_by_recipe(
    db: &PgPool,
    recipe_id: Uuid,
) -> anyhow::Result<Vec<IngredientLine>> {
    let rows = sqlx::query_as::<_, IngredientLine>(
        r#"
        SELECT ri.id, ri.ingredient_id, COALESCE(i.name, 'Unknown') AS name, ri.quantity, ri.unit
          FROM recipe_ingredients ri
          LEFT JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE ri.recipe_id = $1
         ORDER BY ri.created_at ASC, ri.id ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list ingredient lines by recipe")?;
    Ok(rows)
}

pub async fn insert_line_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: f64,
    unit: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(quantity)
    .bind(unit)
    .execute(&mut **tx)
    .await
    .context("insert recipe ingredient")?;
    Ok(())
}

pub async fn delete_lines_by_recipe_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(r#"DELETE FROM recipe_ingredients WHERE recipe_id = $1"#)
        .bind(recipe_id)
        .execute(&mut **tx)
        .await
        .context("delete recipe ingredients by recipe")?;
    Ok(())
}
