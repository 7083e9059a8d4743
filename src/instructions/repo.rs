use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::Instruction;

#[async_trait]
pub trait InstructionStore: Send + Sync {
    async fn list_by_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Vec<Instruction>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Instruction>>;
    async fn create(
        &self,
        recipe_id: Uuid,
        step_number: i32,
        text: &str,
    ) -> anyhow::Result<Instruction>;
    async fn update(&self, id: Uuid, step_number: i32, text: &str) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgInstructionStore {
    db: PgPool,
}

impl PgInstructionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InstructionStore for PgInstructionStore {
    async fn list_by_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Vec<Instruction>> {
        list_by_recipe(&self.db, recipe_id).await
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Instruction>> {
        let row = sqlx::query_as::<_, Instruction>(
            r#"
            SELECT id, recipe_id, step_number, text
              FROM instructions
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find instruction")?;
        Ok(row)
    }

    async fn create(
        &self,
        recipe_id: Uuid,
        step_number: i32,
        text: &str,
    ) -> anyhow::Result<Instruction> {
        let row = sqlx::query_as::<_, Instruction>(
            r#"
            INSERT INTO instructions (recipe_id, step_number, text)
            VALUES ($1, $2, $3)
            RETURNING id, recipe_id, step_number, text
            "#,
        )
        .bind(recipe_id)
        .bind(step_number)
        .bind(text)
        .fetch_one(&self.db)
        .await
        .context("insert instruction")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, step_number: i32, text: &str) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE instructions SET step_number = $2, text = $3 WHERE id = $1"#)
            .bind(id)
            .bind(step_number)
            .bind(text)
            .execute(&self.db)
            .await
            .context("update instruction")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM instructions WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete instruction")?;
        Ok(())
    }
}

pub async fn list_by_recipe(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<Instruction>> {
    let rows = sqlx::query_as::<_, Instruction>(
        r#"
        SELECT id, recipe_id, step_number, text
          FROM instructions
         WHERE recipe_id = $1
         ORDER BY step_number ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list instructions by recipe")?;
    Ok(rows)
}

/// Insert a step within a recipe-wide transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    step_number: i32,
    text: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO instructions (recipe_id, step_number, text)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(recipe_id)
    .bind(step_number)
    .bind(text)
    .execute(&mut **tx)
    .await
    .context("insert instruction")?;
    Ok(())
}

pub async fn delete_by_recipe_tx(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(r#"DELETE FROM instructions WHERE recipe_id = $1"#)
        .bind(recipe_id)
        .execute(&mut **tx)
        .await
        .context("delete instructions by recipe")?;
    Ok(())
}
