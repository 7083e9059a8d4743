use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::{
    aggregate::AggregatedItem,
    repo_types::{ShoppingList, ShoppingListItem, ShoppingListItemView, ShoppingListSummary},
};

#[async_trait]
pub trait ShoppingListStore: Send + Sync {
    /// Header and items in one transaction; items keep the given order.
    async fn create_with_items(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
        items: &[AggregatedItem],
    ) -> anyhow::Result<(ShoppingList, Vec<ShoppingListItem>)>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ShoppingList>>;
    async fn find_items_by_list_id(&self, list_id: Uuid)
        -> anyhow::Result<Vec<ShoppingListItemView>>;
    async fn find_item_by_id(&self, item_id: Uuid) -> anyhow::Result<Option<ShoppingListItem>>;
    async fn update_item(&self, item: &ShoppingListItem) -> anyhow::Result<()>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingListSummary>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgShoppingListStore {
    db: PgPool,
}

impl PgShoppingListStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShoppingListStore for PgShoppingListStore {
    async fn create_with_items(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
        items: &[AggregatedItem],
    ) -> anyhow::Result<(ShoppingList, Vec<ShoppingListItem>)> {
        let mut tx = self.db.begin().await.context("begin shopping list tx")?;

        let list = sqlx::query_as::<_, ShoppingList>(
            r#"
            INSERT INTO shopping_lists (user_id, start_date, end_date)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, start_date, end_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *tx)
        .await
        .context("insert shopping list")?;

        let mut saved = Vec::with_capacity(items.len());
        for (position, item) in (0_i32..).zip(items) {
            let row = sqlx::query_as::<_, ShoppingListItem>(
                r#"
                INSERT INTO shopping_list_items
                       (shopping_list_id, ingredient_id, position, quantity, unit, checked)
                VALUES ($1, $2, $3, $4, $5, FALSE)
                RETURNING id, shopping_list_id, ingredient_id, position, quantity, unit, checked
                "#,
            )
            .bind(list.id)
            .bind(item.ingredient_id)
            .bind(position)
            .bind(item.quantity)
            .bind(&item.unit)
            .fetch_one(&mut *tx)
            .await
            .context("insert shopping list item")?;
            saved.push(row);
        }

        tx.commit().await.context("commit shopping list tx")?;
        Ok((list, saved))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(
            r#"
            SELECT id, user_id, start_date, end_date, created_at
              FROM shopping_lists
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find shopping list")?;
        Ok(row)
    }

    async fn find_items_by_list_id(
        &self,
        list_id: Uuid,
    ) -> anyhow::Result<Vec<ShoppingListItemView>> {
        let rows = sqlx::query_as::<_, ShoppingListItemView>(
            r#"
            SELECT sli.id, sli.ingredient_id, i.name, sli.quantity, sli.unit, sli.checked
              FROM shopping_list_items sli
              LEFT JOIN ingredients i ON i.id = sli.ingredient_id
             WHERE sli.shopping_list_id = $1
             ORDER BY sli.position ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.db)
        .await
        .context("list shopping list items")?;
        Ok(rows)
    }

    async fn find_item_by_id(&self, item_id: Uuid) -> anyhow::Result<Option<ShoppingListItem>> {
        let row = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            SELECT id, shopping_list_id, ingredient_id, position, quantity, unit, checked
              FROM shopping_list_items
             WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .context("find shopping list item")?;
        Ok(row)
    }

    async fn update_item(&self, item: &ShoppingListItem) -> anyhow::Result<()> {
        // only `checked` is mutable
        sqlx::query(r#"UPDATE shopping_list_items SET checked = $2 WHERE id = $1"#)
            .bind(item.id)
            .bind(item.checked)
            .execute(&self.db)
            .await
            .context("update shopping list item")?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingListSummary>> {
        let rows = sqlx::query_as::<_, ShoppingListSummary>(
            r#"
            SELECT sl.id, sl.start_date, sl.end_date,
                   COUNT(sli.id) AS item_count, sl.created_at
              FROM shopping_lists sl
              LEFT JOIN shopping_list_items sli ON sli.shopping_list_id = sl.id
             WHERE sl.user_id = $1
             GROUP BY sl.id
             ORDER BY sl.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list shopping lists")?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM shopping_lists WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete shopping list")?;
        Ok(())
    }
}
