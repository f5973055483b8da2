use crate::{
    dto::options::{CreateOptionRequest, OptionChanges, OptionList, UpdateOptionRequest},
    error::{AppError, AppResult},
    models::{MenuItem, MenuOption},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{self, Filter, StoreError, to_document},
};

fn name_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict { .. } => AppError::Conflict("Option name must be unique".into()),
        other => other.into(),
    }
}

async fn load_option(state: &AppState, id: &str) -> AppResult<MenuOption> {
    store::load(state.store.as_ref(), store::OPTIONS, id)
        .await?
        .ok_or_else(|| AppError::not_found("Option"))
}

/// Menu items that declare the option named `name`.
async fn referencing_items(state: &AppState, name: &str) -> AppResult<Vec<MenuItem>> {
    let items = store::load_all(
        state.store.as_ref(),
        store::MENU,
        &Filter::all().contains("options", name),
    )
    .await?;
    Ok(items)
}

fn in_use(option: &MenuOption, items: &[MenuItem]) -> AppError {
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    AppError::Conflict(format!(
        "Option {} is used by menu item(s): {}",
        option.name,
        names.join(", ")
    ))
}

pub async fn list_options(state: &AppState) -> AppResult<ApiResponse<OptionList>> {
    let items: Vec<MenuOption> =
        store::load_all(state.store.as_ref(), store::OPTIONS, &Filter::all()).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Options", OptionList { items }, Some(meta)))
}

pub async fn get_option(state: &AppState, id: &str) -> AppResult<ApiResponse<MenuOption>> {
    let option = load_option(state, id).await?;
    Ok(ApiResponse::success("Option", option, None))
}

pub async fn create_option(
    state: &AppState,
    payload: CreateOptionRequest,
) -> AppResult<ApiResponse<MenuOption>> {
    payload.validate()?;
    let mut option = MenuOption {
        id: String::new(),
        name: payload.name.trim().to_string(),
        price: payload.price,
    };

    option.id = state
        .store
        .insert(store::OPTIONS, to_document(&option)?)
        .await
        .map_err(name_conflict)?;

    tracing::info!(option_id = %option.id, name = %option.name, "option created");
    Ok(ApiResponse::success(
        "Option created",
        option,
        Some(Meta::empty()),
    ))
}

pub async fn update_option(
    state: &AppState,
    id: &str,
    payload: UpdateOptionRequest,
) -> AppResult<ApiResponse<MenuOption>> {
    payload.validate()?;
    let existing = load_option(state, id).await?;

    let name = payload.name.map(|name| name.trim().to_string());
    if let Some(new_name) = name.as_ref().filter(|new_name| **new_name != existing.name) {
        // Menu items refer to options by name, a rename would orphan them.
        let users = referencing_items(state, &existing.name).await?;
        if !users.is_empty() {
            return Err(in_use(&existing, &users));
        }
        tracing::debug!(option_id = %id, from = %existing.name, to = %new_name, "renaming option");
    }

    let changes = OptionChanges {
        name,
        price: payload.price,
    };
    let updated = state
        .store
        .update(store::OPTIONS, id, to_document(&changes)?)
        .await
        .map_err(name_conflict)?
        .ok_or_else(|| AppError::not_found("Option"))?;

    Ok(ApiResponse::success(
        "Updated",
        store::from_document(updated)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_option(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let option = load_option(state, id).await?;
    let users = referencing_items(state, &option.name).await?;
    if !users.is_empty() {
        return Err(in_use(&option, &users));
    }

    if !state.store.delete(store::OPTIONS, id).await? {
        return Err(AppError::not_found("Option"));
    }

    tracing::info!(option_id = %id, name = %option.name, "option deleted");
    Ok(ApiResponse::message("Option deleted successfully"))
}
