mod common;

use std::sync::Arc;

use chrono::{Datelike, Utc};
use common::{dec, seed_catalog};
use food_truck_api::{
    config::OrderingConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::AddCartItemRequest,
    error::AppError,
    middleware::cart_key::CartKey,
    models::OrderStatus,
    services::{cart_service, option_service, order_service},
    state::AppState,
    store::{Filter, ORDERS, PgDocumentStore, Sort, StoreError},
};
use serde_json::json;

// Runs against a real database only when one is configured.
async fn pg_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL to run postgres store tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE TABLE documents").execute(&pool).await?;

    let store = PgDocumentStore::new(create_orm_conn(pool));
    Ok(Some(AppState::new(Arc::new(store), OrderingConfig::default())))
}

// Both scenarios share one table, so they run in a single test.
#[tokio::test]
async fn postgres_store_end_to_end() -> anyhow::Result<()> {
    let Some(state) = pg_state().await? else {
        return Ok(());
    };

    // Unique index surfaces as a store conflict.
    let store = state.store.as_ref();
    let first = store
        .insert(ORDERS, json!({ "order_number": "FT-1999-0001", "year": 1999, "sequence": 1 })
            .as_object()
            .cloned()
            .unwrap_or_default())
        .await?;
    let clash = store
        .insert(ORDERS, json!({ "order_number": "FT-1999-0001", "year": 1999, "sequence": 1 })
            .as_object()
            .cloned()
            .unwrap_or_default())
        .await;
    assert!(matches!(clash, Err(StoreError::Conflict { .. })));

    // jsonb numbers sort numerically.
    store
        .insert(ORDERS, json!({ "order_number": "FT-1999-10000", "year": 1999, "sequence": 10000 })
            .as_object()
            .cloned()
            .unwrap_or_default())
        .await?;
    let latest = store
        .find_one(ORDERS, &Filter::all().eq("year", 1999), Some(&Sort::desc("sequence")))
        .await?
        .expect("latest order");
    assert_eq!(latest.get("sequence"), Some(&json!(10000)));
    assert!(store.find_one(ORDERS, &Filter::by_id("not-a-uuid"), None).await?.is_none());
    assert!(store.delete(ORDERS, &first).await?);

    // Full checkout through the services.
    let catalog = seed_catalog(&state).await;
    let owner = CartKey::new("pg-truck");
    let duplicate = option_service::create_option(
        &state,
        food_truck_api::dto::options::CreateOptionRequest {
            name: "Bacon".into(),
            price: dec("1.00"),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    cart_service::add_item(
        &state,
        &owner,
        AddCartItemRequest {
            menu_item_id: catalog.burger.id.clone(),
            quantity: 2,
            selected_options: vec!["Extra Cheese".into()],
            note: None,
        },
    )
    .await?;
    let order = order_service::checkout(&state, &owner)
        .await?
        .data
        .expect("order");
    assert_eq!(order.order_number, format!("FT-{}-0001", Utc::now().year()));
    assert_eq!(order.total, dec("28.98"));

    let paid = order_service::pay_order(&state, &order.id).await?.data.expect("order");
    assert_eq!(paid.status, OrderStatus::InPreparation);
    Ok(())
}
