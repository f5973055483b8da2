use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{CartLineItem, timestamp},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub menu_item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub selected_options: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
    #[serde(default)]
    pub selected_options: Vec<String>,
    pub note: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

pub(crate) fn check_quantity(quantity: i64) -> AppResult<u32> {
    match u32::try_from(quantity) {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        )),
    }
}

/// Blank notes are dropped.
pub(crate) fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Cart fields rewritten after every item change.
#[derive(Debug, Serialize)]
pub(crate) struct CartContents<'a> {
    pub items: &'a [CartLineItem],
    pub total: Decimal,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}
