mod common;

use common::{create_item, create_option, dec, seed_catalog};
use food_truck_api::{
    dto::{
        menu::{CreateMenuItemRequest, UpdateMenuItemRequest},
        options::{CreateOptionRequest, UpdateOptionRequest},
    },
    error::AppError,
    routes::params::MenuQuery,
    services::{menu_service, option_service},
    state::AppState,
};

#[tokio::test]
async fn option_names_are_unique() {
    let state = AppState::in_memory();
    create_option(&state, "Bacon", "2.00").await;

    let err = option_service::create_option(
        &state,
        CreateOptionRequest {
            name: "Bacon".into(),
            price: dec("1.00"),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Option name must be unique"));
}

#[tokio::test]
async fn option_validation_rejects_blank_name_and_negative_price() {
    let state = AppState::in_memory();
    let blank = option_service::create_option(
        &state,
        CreateOptionRequest {
            name: "   ".into(),
            price: dec("1.00"),
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let negative = option_service::create_option(
        &state,
        CreateOptionRequest {
            name: "Bacon".into(),
            price: dec("-0.01"),
        },
    )
    .await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));

    let empty_update =
        option_service::update_option(&state, "any", UpdateOptionRequest::default()).await;
    assert!(matches!(empty_update, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn menu_item_reports_every_unknown_option() {
    let state = AppState::in_memory();
    create_option(&state, "Bacon", "2.00").await;

    let err = menu_service::create_menu_item(
        &state,
        CreateMenuItemRequest {
            name: "Burger".into(),
            description: None,
            price: dec("12.99"),
            available: true,
            options: vec!["Bacon".into(), "Truffle".into(), "Gold Leaf".into(), "Truffle".into()],
        },
    )
    .await
    .unwrap_err();

    match err {
        AppError::InvalidOption(missing) => assert_eq!(missing, vec!["Truffle", "Gold Leaf"]),
        other => panic!("expected InvalidOption, got {other:?}"),
    }
    assert!(menu_service::list_menu(&state, MenuQuery::default())
        .await
        .unwrap()
        .data
        .unwrap()
        .items
        .is_empty());
}

#[tokio::test]
async fn menu_item_names_are_unique_across_create_and_update() {
    let state = AppState::in_memory();
    create_item(&state, "Burger", "12.99", &[], true).await;
    let wrap = create_item(&state, "Wrap", "9.50", &[], true).await;

    let rename = menu_service::update_menu_item(
        &state,
        &wrap.id,
        UpdateMenuItemRequest {
            name: Some("Burger".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(rename, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn list_menu_filters_on_availability() {
    let state = AppState::in_memory();
    seed_catalog(&state).await;

    let all = menu_service::list_menu(&state, MenuQuery::default())
        .await
        .unwrap();
    assert_eq!(all.data.unwrap().items.len(), 2);

    let available = menu_service::list_menu(
        &state,
        MenuQuery {
            available: Some(true),
        },
    )
    .await
    .unwrap();
    let meta = available.meta.clone().unwrap();
    let items = available.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Burger");
    assert_eq!(meta.total, Some(1));
}

#[tokio::test]
async fn update_menu_item_changes_only_given_fields() {
    let state = AppState::in_memory();
    let catalog = seed_catalog(&state).await;

    let updated = menu_service::update_menu_item(
        &state,
        &catalog.soup.id,
        UpdateMenuItemRequest {
            available: Some(true),
            price: Some(dec("5.50")),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();

    assert!(updated.available);
    assert_eq!(updated.price, dec("5.50"));
    assert_eq!(updated.name, "Soup of the Day");
    assert_eq!(updated.created_at, catalog.soup.created_at);
    assert!(updated.updated_at >= catalog.soup.updated_at);
}

#[tokio::test]
async fn options_in_use_cannot_be_renamed_or_deleted() {
    let state = AppState::in_memory();
    let bacon = create_option(&state, "Bacon", "2.00").await;
    create_item(&state, "Burger", "12.99", &["Bacon"], true).await;

    let rename = option_service::update_option(
        &state,
        &bacon.id,
        UpdateOptionRequest {
            name: Some("Crispy Bacon".into()),
            price: None,
        },
    )
    .await;
    assert!(matches!(rename, Err(AppError::Conflict(ref msg)) if msg.contains("Burger")));

    let delete = option_service::delete_option(&state, &bacon.id).await;
    assert!(matches!(delete, Err(AppError::Conflict(_))));

    // Price changes keep the name, so they are allowed.
    let repriced = option_service::update_option(
        &state,
        &bacon.id,
        UpdateOptionRequest {
            name: None,
            price: Some(dec("2.25")),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(repriced.price, dec("2.25"));
    assert_eq!(repriced.name, "Bacon");
}

#[tokio::test]
async fn unused_option_can_be_deleted() {
    let state = AppState::in_memory();
    let bacon = create_option(&state, "Bacon", "2.00").await;

    let resp = option_service::delete_option(&state, &bacon.id).await.unwrap();
    assert_eq!(resp.message, "Option deleted successfully");

    let again = option_service::get_option(&state, &bacon.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_missing_menu_item_is_not_found() {
    let state = AppState::in_memory();
    let err = menu_service::delete_menu_item(&state, "missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref what) if what == "Menu item"));
}

#[tokio::test]
async fn description_is_kept_when_omitted_and_cleared_by_null() {
    let state = AppState::in_memory();
    let item = menu_service::create_menu_item(
        &state,
        CreateMenuItemRequest {
            name: "Taco".into(),
            description: Some("Corn tortilla".into()),
            price: dec("4.00"),
            available: true,
            options: Vec::new(),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();

    let omitted: UpdateMenuItemRequest = serde_json::from_str(r#"{ "price": "4.50" }"#).unwrap();
    let kept = menu_service::update_menu_item(&state, &item.id, omitted)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(kept.description.as_deref(), Some("Corn tortilla"));

    let cleared: UpdateMenuItemRequest =
        serde_json::from_str(r#"{ "description": null }"#).unwrap();
    assert_eq!(cleared.description, Some(None));
    let cleared = menu_service::update_menu_item(&state, &item.id, cleared)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.price, dec("4.50"));
}
