use crate::{
    dto::cart::{
        AddCartItemRequest, CartContents, UpdateCartItemRequest, check_quantity, clean_note,
    },
    error::{AppError, AppResult},
    middleware::cart_key::CartKey,
    models::{self, Cart, CartLineItem},
    response::{ApiResponse, Meta},
    services::{
        catalog::validate_item_and_options,
        pricing::{cart_total, line_total},
    },
    state::AppState,
    store::{self, DocumentStore, Filter, Sort, from_document, to_document},
};

/// Most recently created cart of `owner`.
pub async fn active_cart(store: &dyn DocumentStore, owner: &CartKey) -> AppResult<Option<Cart>> {
    let found = store
        .find_one(
            store::CARTS,
            &Filter::all().eq("owner", owner.as_str()),
            Some(&Sort::desc("created_at")),
        )
        .await?;
    Ok(found.map(from_document::<Cart>).transpose()?)
}

async fn require_cart(state: &AppState, owner: &CartKey) -> AppResult<Cart> {
    active_cart(state.store.as_ref(), owner)
        .await?
        .ok_or_else(|| AppError::not_found("Cart"))
}

/// Validates and prices one line against the live catalog.
async fn build_line(
    state: &AppState,
    menu_item_id: String,
    quantity: i64,
    selected_options: Vec<String>,
    note: Option<String>,
) -> AppResult<CartLineItem> {
    let quantity = check_quantity(quantity)?;
    let (menu_item, options) =
        validate_item_and_options(state.store.as_ref(), &menu_item_id, &selected_options).await?;
    let total_price = line_total(menu_item.price, quantity, &selected_options, &options);

    Ok(CartLineItem {
        menu_item_id,
        quantity,
        selected_options,
        note: clean_note(note),
        total_price,
    })
}

/// Writes the items back and recomputes the cart total.
async fn save_items(state: &AppState, mut cart: Cart) -> AppResult<Cart> {
    cart.total = cart_total(&cart.items);
    cart.updated_at = models::now();

    let contents = CartContents {
        items: &cart.items,
        total: cart.total,
        updated_at: cart.updated_at,
    };
    let saved = state
        .store
        .update(store::CARTS, &cart.id, to_document(&contents)?)
        .await?
        .ok_or_else(|| AppError::not_found("Cart"))?;
    Ok(from_document::<Cart>(saved)?)
}

pub async fn get_cart(state: &AppState, owner: &CartKey) -> AppResult<ApiResponse<Cart>> {
    let cart = require_cart(state, owner).await?;
    let meta = Meta::total(cart.items.len());
    Ok(ApiResponse::success("OK", cart, Some(meta)))
}

pub async fn add_item(
    state: &AppState,
    owner: &CartKey,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<Cart>> {
    let line = build_line(
        state,
        payload.menu_item_id,
        payload.quantity,
        payload.selected_options,
        payload.note,
    )
    .await?;
    let menu_item_id = line.menu_item_id.clone();

    let cart = match active_cart(state.store.as_ref(), owner).await? {
        Some(mut cart) => {
            cart.items.push(line);
            save_items(state, cart).await?
        }
        None => {
            let now = models::now();
            let mut cart = Cart {
                id: String::new(),
                owner: owner.as_str().to_string(),
                total: line.total_price,
                items: vec![line],
                created_at: now,
                updated_at: now,
            };
            cart.id = state
                .store
                .insert(store::CARTS, to_document(&cart)?)
                .await?;
            tracing::debug!(cart_id = %cart.id, owner = %owner.as_str(), "cart created");
            cart
        }
    };

    tracing::info!(
        cart_id = %cart.id,
        menu_item_id = %menu_item_id,
        total = %cart.total,
        "item added to cart"
    );
    Ok(ApiResponse::success("Item added to cart", cart, None))
}

pub async fn update_item(
    state: &AppState,
    owner: &CartKey,
    menu_item_id: &str,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<Cart>> {
    let mut cart = require_cart(state, owner).await?;
    let position = cart
        .items
        .iter()
        .position(|item| item.menu_item_id == menu_item_id)
        .ok_or_else(|| AppError::not_found("Item in cart"))?;

    let line = build_line(
        state,
        menu_item_id.to_string(),
        payload.quantity,
        payload.selected_options,
        payload.note,
    )
    .await?;
    cart.items[position] = line;
    let cart = save_items(state, cart).await?;

    tracing::info!(cart_id = %cart.id, menu_item_id = %menu_item_id, total = %cart.total, "cart item updated");
    Ok(ApiResponse::success("Cart item updated", cart, None))
}

pub async fn remove_item(
    state: &AppState,
    owner: &CartKey,
    menu_item_id: &str,
) -> AppResult<ApiResponse<Cart>> {
    let mut cart = require_cart(state, owner).await?;
    cart.items.retain(|item| item.menu_item_id != menu_item_id);
    let cart = save_items(state, cart).await?;

    tracing::info!(cart_id = %cart.id, menu_item_id = %menu_item_id, "item removed from cart");
    Ok(ApiResponse::success("Item removed from cart", cart, None))
}

pub async fn clear_cart(
    state: &AppState,
    owner: &CartKey,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = require_cart(state, owner).await?;
    if !state.store.delete(store::CARTS, &cart.id).await? {
        return Err(AppError::not_found("Cart"));
    }

    tracing::info!(cart_id = %cart.id, "cart cleared");
    Ok(ApiResponse::message("Cart cleared successfully"))
}
