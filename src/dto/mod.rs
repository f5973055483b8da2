pub mod cart;
pub mod menu;
pub mod options;
pub mod orders;

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

pub(crate) fn check_name(field: &str, value: &str, max_len: usize) -> AppResult<()> {
    let len = value.trim().chars().count();
    if len == 0 || len > max_len {
        return Err(AppError::BadRequest(format!(
            "{field} must be between 1 and {max_len} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_price(field: &str, value: Decimal) -> AppResult<()> {
    if value <= Decimal::ZERO {
        return Err(AppError::BadRequest(format!("{field} must be greater than 0")));
    }
    Ok(())
}
