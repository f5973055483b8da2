use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::{check_name, check_price},
    error::{AppError, AppResult},
    models::{MenuItem, timestamp},
};

pub const MENU_NAME_MAX_LEN: usize = 100;
pub const MENU_DESCRIPTION_MAX_LEN: usize = 500;

fn default_available() -> bool {
    true
}

fn check_description(description: Option<&str>) -> AppResult<()> {
    match description {
        Some(text) if text.chars().count() > MENU_DESCRIPTION_MAX_LEN => Err(AppError::BadRequest(
            format!("description must be at most {MENU_DESCRIPTION_MAX_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Option names, each must exist in the option catalog.
    #[serde(default)]
    pub options: Vec<String>,
}

impl CreateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        check_name("name", &self.name, MENU_NAME_MAX_LEN)?;
        check_description(self.description.as_deref())?;
        check_price("price", self.price)
    }
}

/// Maps a present field to `Some`, so an explicit `null` becomes `Some(None)`
/// while an absent field stays `None` through `#[serde(default)]`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    /// Omit to keep the description, `null` to clear it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub options: Option<Vec<String>>,
}

impl UpdateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            check_name("name", name, MENU_NAME_MAX_LEN)?;
        }
        check_description(self.description.as_ref().and_then(Option::as_deref))?;
        if let Some(price) = self.price {
            check_price("price", price)?;
        }
        Ok(())
    }
}

/// Mutable menu item fields written by an update.
#[derive(Debug, Serialize)]
pub(crate) struct MenuItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` writes `null`, clearing the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuList {
    #[schema(value_type = Vec<MenuItem>)]
    pub items: Vec<MenuItem>,
}
