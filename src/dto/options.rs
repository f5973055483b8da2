use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::{check_name, check_price},
    error::{AppError, AppResult},
    models::MenuOption,
};

pub const OPTION_NAME_MAX_LEN: usize = 50;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOptionRequest {
    pub name: String,
    #[schema(value_type = String, example = "1.50")]
    pub price: Decimal,
}

impl CreateOptionRequest {
    pub fn validate(&self) -> AppResult<()> {
        check_name("name", &self.name, OPTION_NAME_MAX_LEN)?;
        check_price("price", self.price)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOptionRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

impl UpdateOptionRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.is_none() && self.price.is_none() {
            return Err(AppError::BadRequest("No valid fields to update".into()));
        }
        if let Some(name) = &self.name {
            check_name("name", name, OPTION_NAME_MAX_LEN)?;
        }
        if let Some(price) = self.price {
            check_price("price", price)?;
        }
        Ok(())
    }
}

/// Mutable option fields written by an update.
#[derive(Debug, Serialize)]
pub(crate) struct OptionChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OptionList {
    #[schema(value_type = Vec<MenuOption>)]
    pub items: Vec<MenuOption>,
}
