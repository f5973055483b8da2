use chrono::Datelike;
use rust_decimal::Decimal;

use crate::{
    config::CART_DELETE_BACKOFF_MAX,
    dto::orders::{OrderList, StatusChange, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::cart_key::CartKey,
    models::{self, Cart, Order, OrderLineItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        cart_service::active_cart,
        catalog::validate_item_and_options,
        numbering::next_order_number,
        order_state::{OrderAction, transition},
        pricing::{cart_total, line_total},
    },
    state::AppState,
    store::{self, Filter, StoreError, from_document, to_document},
};

/// Turns the owner's active cart into a `PENDING` order and removes the cart.
/// Success is only returned once the cart is confirmed gone.
///
/// Every line is checked and priced again against the live catalog, and the
/// order keeps a copy of names and prices so later catalog edits do not
/// reach it.
pub async fn checkout(state: &AppState, owner: &CartKey) -> AppResult<ApiResponse<Order>> {
    let cart = active_cart(state.store.as_ref(), owner)
        .await?
        .ok_or_else(|| AppError::not_found("Cart"))?;
    if cart.items.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let items = snapshot_lines(state, &cart).await?;
    let total = cart_total(&items);
    let order = insert_order(state, items, total).await?;

    remove_checked_out_cart(state, &cart).await;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total,
        "order created"
    );
    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

async fn snapshot_lines(state: &AppState, cart: &Cart) -> AppResult<Vec<OrderLineItem>> {
    let mut lines = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let (menu_item, options) = validate_item_and_options(
            state.store.as_ref(),
            &item.menu_item_id,
            &item.selected_options,
        )
        .await?;

        lines.push(OrderLineItem {
            menu_item_id: item.menu_item_id.clone(),
            unit_price: line_total(menu_item.price, 1, &item.selected_options, &options),
            total_price: line_total(
                menu_item.price,
                item.quantity,
                &item.selected_options,
                &options,
            ),
            name: menu_item.name,
            base_price: menu_item.price,
            quantity: item.quantity,
            selected_options: item.selected_options.clone(),
            note: item.note.clone(),
        });
    }
    Ok(lines)
}

/// Inserts the order under the next free number, asking for a new number
/// whenever a concurrent checkout took the one just computed.
async fn insert_order(
    state: &AppState,
    items: Vec<OrderLineItem>,
    total: Decimal,
) -> AppResult<Order> {
    let now = models::now();
    let year = now.year();
    let max_attempts = state.ordering.order_number_max_attempts.max(1);

    let mut order = Order {
        id: String::new(),
        order_number: String::new(),
        year,
        sequence: 0,
        items,
        total,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    for attempt in 1..=max_attempts {
        let number = next_order_number(state.store.as_ref(), year).await?;
        order.order_number = number.to_string();
        order.sequence = number.sequence;

        match state.store.insert(store::ORDERS, to_document(&order)?).await {
            Ok(id) => {
                order.id = id;
                return Ok(order);
            }
            Err(StoreError::Conflict { .. }) => {
                tracing::warn!(
                    attempt,
                    order_number = %order.order_number,
                    "order number already taken, retrying"
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Conflict(format!(
        "could not allocate an order number after {max_attempts} attempts"
    )))
}

/// Deletes the checked-out cart, retrying with backoff until the store
/// confirms it is gone. The order is already stored and stays the source of
/// truth, so store errors here are never surfaced to the caller.
async fn remove_checked_out_cart(state: &AppState, cart: &Cart) {
    let mut delay = state.ordering.cart_delete_backoff;
    let mut attempt: u32 = 1;

    loop {
        match state.store.delete(store::CARTS, &cart.id).await {
            Ok(true) => return,
            Ok(false) => {
                // Already removed, e.g. by a concurrent clear.
                tracing::debug!(cart_id = %cart.id, "checked-out cart already gone");
                return;
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    cart_id = %cart.id,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %err,
                    "cart removal failed, retrying"
                );
            }
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(CART_DELETE_BACKOFF_MAX);
        attempt += 1;
    }
}

pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut filter = Filter::all();
    if let Some(status) = query.status {
        filter = filter.eq("status", status.as_str());
    }

    let mut orders: Vec<Order> =
        store::load_all(state.store.as_ref(), store::ORDERS, &filter).await?;
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => orders.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let total = orders.len() as i64;
    let items = orders
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

async fn load_order(state: &AppState, id: &str) -> AppResult<Order> {
    store::load(state.store.as_ref(), store::ORDERS, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))
}

pub async fn get_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = load_order(state, id).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn get_order_by_number(
    state: &AppState,
    order_number: &str,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .store
        .find_one(
            store::ORDERS,
            &Filter::all().eq("order_number", order_number),
            None,
        )
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(
        "OK",
        from_document::<Order>(order)?,
        Some(Meta::empty()),
    ))
}

async fn apply_action(state: &AppState, id: &str, action: OrderAction) -> AppResult<Order> {
    let order = load_order(state, id).await?;
    let status = transition(order.status, action)?;

    let change = StatusChange {
        status,
        updated_at: models::now(),
    };
    let updated = state
        .store
        .update(store::ORDERS, id, to_document(&change)?)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    tracing::info!(
        order_id = %id,
        from = %order.status,
        to = %status,
        "order status changed"
    );
    Ok(from_document(updated)?)
}

pub async fn pay_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = apply_action(state, id, OrderAction::Pay).await?;
    Ok(ApiResponse::success(
        "Payment recorded",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = apply_action(state, id, OrderAction::Cancel).await?;
    Ok(ApiResponse::success(
        "Order cancelled",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = apply_action(state, id, OrderAction::SetStatus(payload.status)).await?;
    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}
