use crate::{
    dto::menu::{CreateMenuItemRequest, MenuItemChanges, MenuList, UpdateMenuItemRequest},
    error::{AppError, AppResult},
    models::{self, MenuItem},
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    services::catalog::validate_option_names,
    state::AppState,
    store::{self, Filter, StoreError, to_document},
};

fn name_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict { .. } => AppError::Conflict("Menu item name must be unique".into()),
        other => other.into(),
    }
}

/// Trims names and drops repeated entries, keeping first occurrences.
fn normalize_options(options: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(options.len());
    for name in options {
        let name = name.trim().to_string();
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let mut filter = Filter::all();
    if let Some(available) = query.available {
        filter = filter.eq("available", available);
    }
    let items: Vec<MenuItem> = store::load_all(state.store.as_ref(), store::MENU, &filter).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: &str) -> AppResult<ApiResponse<MenuItem>> {
    let item: MenuItem = store::load(state.store.as_ref(), store::MENU, id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item"))?;
    Ok(ApiResponse::success("Menu item", item, None))
}

pub async fn create_menu_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    payload.validate()?;
    let options = normalize_options(payload.options);
    validate_option_names(state.store.as_ref(), &options).await?;

    let now = models::now();
    let mut item = MenuItem {
        id: String::new(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        available: payload.available,
        options,
        created_at: now,
        updated_at: now,
    };
    item.id = state
        .store
        .insert(store::MENU, to_document(&item)?)
        .await
        .map_err(name_conflict)?;

    tracing::info!(menu_item_id = %item.id, name = %item.name, "menu item created");
    Ok(ApiResponse::success(
        "Menu item created",
        item,
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    id: &str,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    payload.validate()?;
    let options = payload.options.map(normalize_options);
    if let Some(options) = &options {
        validate_option_names(state.store.as_ref(), options).await?;
    }

    let changes = MenuItemChanges {
        name: payload.name.map(|name| name.trim().to_string()),
        description: payload.description,
        price: payload.price,
        available: payload.available,
        options,
        updated_at: models::now(),
    };
    let updated = state
        .store
        .update(store::MENU, id, to_document(&changes)?)
        .await
        .map_err(name_conflict)?
        .ok_or_else(|| AppError::not_found("Menu item"))?;

    Ok(ApiResponse::success(
        "Updated",
        store::from_document(updated)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.store.delete(store::MENU, id).await? {
        return Err(AppError::not_found("Menu item"));
    }

    tracing::info!(menu_item_id = %id, "menu item deleted");
    Ok(ApiResponse::message("Menu item deleted successfully"))
}
