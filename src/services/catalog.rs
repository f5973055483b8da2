//! Catalog checks shared by cart, checkout and catalog management.

use crate::{
    error::{AppError, AppResult},
    models::{MenuItem, MenuOption},
    store::{self, DocumentStore, Filter},
};

/// Options from the catalog whose names are in `names`.
pub async fn find_options(store: &dyn DocumentStore, names: &[String]) -> AppResult<Vec<MenuOption>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let options = store::load_all(
        store,
        store::OPTIONS,
        &Filter::all().any_of("name", names.iter().cloned()),
    )
    .await?;
    Ok(options)
}

/// Loads an orderable menu item and the catalog options behind
/// `selected_options`.
///
/// Fails on the first selected name that the item does not declare or that
/// has no matching option in the catalog.
pub async fn validate_item_and_options(
    store: &dyn DocumentStore,
    menu_item_id: &str,
    selected_options: &[String],
) -> AppResult<(MenuItem, Vec<MenuOption>)> {
    let menu_item: MenuItem = store::load(store, store::MENU, menu_item_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {menu_item_id}")))?;

    if !menu_item.available {
        return Err(AppError::Unavailable(menu_item.name));
    }

    if let Some(undeclared) = selected_options
        .iter()
        .find(|name| !menu_item.options.contains(name))
    {
        return Err(AppError::InvalidOption(vec![undeclared.clone()]));
    }

    let options = find_options(store, selected_options).await?;
    if let Some(unknown) = selected_options
        .iter()
        .find(|name| !options.iter().any(|option| &option.name == *name))
    {
        return Err(AppError::InvalidOption(vec![unknown.clone()]));
    }

    Ok((menu_item, options))
}

/// Checks that every name exists in the option catalog, reporting all
/// missing names at once.
pub async fn validate_option_names(store: &dyn DocumentStore, names: &[String]) -> AppResult<()> {
    let found = find_options(store, names).await?;
    let mut missing: Vec<String> = Vec::new();
    for name in names {
        if !found.iter().any(|option| &option.name == name) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidOption(missing))
    }
}
