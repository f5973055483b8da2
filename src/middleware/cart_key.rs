use axum::extract::FromRequestParts;

use crate::{error::AppError, state::AppState};

pub const CART_KEY_HEADER: &str = "x-cart-key";
pub const CART_KEY_MAX_LEN: usize = 128;

/// Owner of a cart. Every cart and checkout call is scoped to one key; the
/// active cart is the most recently created cart of that key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartKey(String);

impl CartKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reads the `x-cart-key` header, falling back to the configured default key
/// so that clients without one share a single cart.
impl FromRequestParts<AppState> for CartKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(CART_KEY_HEADER) else {
            return Ok(CartKey::new(state.ordering.default_cart_key.clone()));
        };

        let key = header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid x-cart-key header".into()))?
            .trim();
        if key.is_empty() || key.len() > CART_KEY_MAX_LEN {
            return Err(AppError::BadRequest(format!(
                "x-cart-key must be between 1 and {CART_KEY_MAX_LEN} characters"
            )));
        }

        Ok(CartKey::new(key))
    }
}
