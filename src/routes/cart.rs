use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::{
    dto::cart::{AddCartItemRequest, UpdateCartItemRequest},
    error::AppResult,
    middleware::cart_key::CartKey,
    models::Cart,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/{menu_item_id}", put(update_item).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-cart-key" = Option<String>, Header, description = "Cart owner, defaults to the configured key")
    ),
    responses(
        (status = 200, description = "Active cart of the owner", body = ApiResponse<Cart>),
        (status = 404, description = "No active cart"),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    owner: CartKey,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::get_cart(&state, &owner).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    params(
        ("x-cart-key" = Option<String>, Header, description = "Cart owner, defaults to the configured key")
    ),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added, cart created when missing", body = ApiResponse<Cart>),
        (status = 400, description = "Bad quantity or invalid option"),
        (status = 404, description = "Menu item not found"),
        (status = 422, description = "Menu item unavailable"),
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    owner: CartKey,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::add_item(&state, &owner, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{menu_item_id}",
    params(
        ("menu_item_id" = String, Path, description = "Menu item ID of the cart line"),
        ("x-cart-key" = Option<String>, Header, description = "Cart owner, defaults to the configured key")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart line replaced", body = ApiResponse<Cart>),
        (status = 400, description = "Bad quantity or invalid option"),
        (status = 404, description = "Cart or cart line not found"),
        (status = 422, description = "Menu item unavailable"),
    ),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    owner: CartKey,
    Path(menu_item_id): Path<String>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::update_item(&state, &owner, &menu_item_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{menu_item_id}",
    params(
        ("menu_item_id" = String, Path, description = "Menu item ID of the cart lines to drop"),
        ("x-cart-key" = Option<String>, Header, description = "Cart owner, defaults to the configured key")
    ),
    responses(
        (status = 200, description = "Matching lines removed", body = ApiResponse<Cart>),
        (status = 404, description = "No active cart"),
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    owner: CartKey,
    Path(menu_item_id): Path<String>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::remove_item(&state, &owner, &menu_item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(
        ("x-cart-key" = Option<String>, Header, description = "Cart owner, defaults to the configured key")
    ),
    responses(
        (status = 200, description = "Cart deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No active cart"),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    owner: CartKey,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, &owner).await?;
    Ok(Json(resp))
}
