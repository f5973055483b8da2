//! Document store abstraction used by the ordering core.
//!
//! Every collection holds JSON objects keyed by a string `id`. The core only
//! needs five primitives (`find`, `find_one`, `insert`, `update`, `delete`),
//! so a backend is anything that can provide them plus unique-field
//! enforcement for [`UNIQUE_FIELDS`].

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

pub type Document = serde_json::Map<String, Value>;

pub const MENU: &str = "menu";
pub const OPTIONS: &str = "options";
pub const CARTS: &str = "carts";
pub const ORDERS: &str = "orders";

/// `(collection, field)` pairs whose values must be unique within the collection.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[
    (MENU, "name"),
    (OPTIONS, "name"),
    (ORDERS, "order_number"),
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field in {collection}: {detail}")]
    Conflict { collection: String, detail: String },

    #[error("ORM error")]
    Orm(#[from] sea_orm::DbErr),

    #[error("document codec error")]
    Codec(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value.
    Eq(String, Value),
    /// Field equals one of the values.
    In(String, Vec<Value>),
    /// Field is an array containing the value.
    Contains(String, Value),
}

/// Conjunction of field conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::all().eq("id", id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn any_of<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(field.to_string(), values));
        self
    }

    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Contains(field.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq(field, value) => document.get(field) == Some(value),
            Condition::In(field, values) => document
                .get(field)
                .is_some_and(|found| values.contains(found)),
            Condition::Contains(field, value) => document
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// First match under `sort`; without a sort the backend's natural order applies.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>>;

    /// Stores the document under a freshly generated id and returns that id.
    /// Any `id` key in the document is ignored.
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<String>;

    /// Merges the top-level keys of `patch` into the document.
    /// Returns `None` when no document has the id.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;
}

pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(StoreError::Codec(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        )))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Ordering used for sorting documents: numbers numerically, strings
/// lexicographically, missing and null values first.
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_u64(), b.as_u64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .unwrap_or_default()
                .total_cmp(&b.as_f64().unwrap_or_default()),
        },
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

/// Typed `find_one` by id.
pub async fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> StoreResult<Option<T>> {
    store
        .find_one(collection, &Filter::by_id(id), None)
        .await?
        .map(from_document)
        .transpose()
}

/// Typed `find`.
pub async fn load_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
) -> StoreResult<Vec<T>> {
    store
        .find(collection, filter)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}
