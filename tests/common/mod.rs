#![allow(dead_code)]

use std::{
    str::FromStr,
    time::Duration,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use food_truck_api::{
    config::OrderingConfig,
    dto::{menu::CreateMenuItemRequest, options::CreateOptionRequest},
    models::{MenuItem, MenuOption},
    services::{menu_service, option_service},
    state::AppState,
    store::{
        self, Document, DocumentStore, Filter, MemoryStore, Sort, StoreError, StoreResult,
    },
};
use rust_decimal::Decimal;

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal literal")
}

pub fn state_with(store: impl DocumentStore + 'static) -> AppState {
    AppState::new(Arc::new(store), OrderingConfig::default())
}

pub fn fast_retries() -> OrderingConfig {
    OrderingConfig {
        cart_delete_backoff: Duration::from_millis(1),
        ..OrderingConfig::default()
    }
}

pub async fn create_option(state: &AppState, name: &str, price: &str) -> MenuOption {
    option_service::create_option(
        state,
        CreateOptionRequest {
            name: name.to_string(),
            price: dec(price),
        },
    )
    .await
    .expect("create option")
    .data
    .expect("option data")
}

pub async fn create_item(
    state: &AppState,
    name: &str,
    price: &str,
    options: &[&str],
    available: bool,
) -> MenuItem {
    menu_service::create_menu_item(
        state,
        CreateMenuItemRequest {
            name: name.to_string(),
            description: None,
            price: dec(price),
            available,
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    )
    .await
    .expect("create menu item")
    .data
    .expect("menu item data")
}

/// Burger at 12.99 with "Extra Cheese" (1.50) and "Bacon" (2.00), plus an
/// unavailable "Soup of the Day".
pub struct Catalog {
    pub burger: MenuItem,
    pub soup: MenuItem,
}

pub async fn seed_catalog(state: &AppState) -> Catalog {
    create_option(state, "Extra Cheese", "1.50").await;
    create_option(state, "Bacon", "2.00").await;
    let burger = create_item(state, "Burger", "12.99", &["Extra Cheese", "Bacon"], true).await;
    let soup = create_item(state, "Soup of the Day", "5.00", &[], false).await;
    Catalog { burger, soup }
}

/// Wraps a store and, the first time an order is inserted, sneaks in a
/// competing order holding the same number, as a concurrent checkout would.
pub struct RacingStore {
    pub inner: MemoryStore,
    pub races: AtomicUsize,
}

impl RacingStore {
    pub fn new(races: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            races: AtomicUsize::new(races),
        }
    }
}

#[async_trait]
impl DocumentStore for RacingStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>> {
        self.inner.find_one(collection, filter, sort).await
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<String> {
        let racing = collection == store::ORDERS
            && self
                .races
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
        if racing {
            self.inner.insert(collection, document.clone()).await?;
        }
        self.inner.insert(collection, document).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.inner.delete(collection, id).await
    }
}

/// Wraps a store whose first `failures` cart deletions fail.
pub struct StuckCartStore {
    pub inner: MemoryStore,
    pub failures: usize,
    pub cart_delete_calls: AtomicUsize,
}

impl StuckCartStore {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures,
            cart_delete_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentStore for StuckCartStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>> {
        self.inner.find_one(collection, filter, sort).await
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<String> {
        self.inner.insert(collection, document).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        if collection == store::CARTS {
            let call = self.cart_delete_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(StoreError::Orm(sea_orm::DbErr::Custom(
                    "connection reset".into(),
                )));
            }
        }
        self.inner.delete(collection, id).await
    }
}

/// Deletes every cart as soon as an order is written, like a clear racing
/// the checkout.
pub struct ClearingStore {
    pub inner: MemoryStore,
}

impl ClearingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl DocumentStore for ClearingStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>> {
        self.inner.find_one(collection, filter, sort).await
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<String> {
        let id = self.inner.insert(collection, document).await?;
        if collection == store::ORDERS {
            for cart in self.inner.find(store::CARTS, &Filter::all()).await? {
                if let Some(cart_id) = cart.get("id").and_then(|value| value.as_str()) {
                    self.inner.delete(store::CARTS, cart_id).await?;
                }
            }
        }
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.inner.delete(collection, id).await
    }
}
