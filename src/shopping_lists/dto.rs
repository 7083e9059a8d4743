use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{ShoppingListItem, ShoppingListItemView, ShoppingListSummary};
use crate::dates::format_date;

/// Shown for items whose ingredient row no longer exists.
pub const UNKNOWN_INGREDIENT: &str = "Unknown";

#[derive(Debug, Deserialize)]
pub struct GenerateShoppingListRequest {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListItemResponse {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub checked: bool,
}

impl From<ShoppingListItemView> for ShoppingListItemResponse {
    fn from(v: ShoppingListItemView) -> Self {
        Self {
            id: v.id,
            ingredient_id: v.ingredient_id,
            name: v.name.unwrap_or_else(|| UNKNOWN_INGREDIENT.to_string()),
            quantity: v.quantity,
            unit: v.unit,
            checked: v.checked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub id: Uuid,
    pub start_date: String,
    pub end_date: String,
    pub items: Vec<ShoppingListItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct ToggledItemResponse {
    pub id: Uuid,
    pub checked: bool,
}

impl From<ShoppingListItem> for ToggledItemResponse {
    fn from(item: ShoppingListItem) -> Self {
        Self {
            id: item.id,
            checked: item.checked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShoppingListSummaryResponse {
    pub id: Uuid,
    pub start_date: String,
    pub end_date: String,
    pub item_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ShoppingListSummary> for ShoppingListSummaryResponse {
    fn from(s: ShoppingListSummary) -> Self {
        Self {
            id: s.id,
            start_date: format_date(s.start_date),
            end_date: format_date(s.end_date),
            item_count: s.item_count,
            created_at: s.created_at,
        }
    }
}
