use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Header of a generated shopping list. Never updated after creation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub shopping_list_id: Uuid,
    pub ingredient_id: Uuid,
    pub position: i32,
    pub quantity: f64,
    pub unit: String,
    pub checked: bool,
}

/// Item with the ingredient name joined in; `None` when the ingredient row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct ShoppingListItemView {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub checked: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShoppingListSummary {
    pub id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub item_count: i64,
    pub created_at: OffsetDateTime,
}
