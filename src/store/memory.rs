use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Document, DocumentStore, Filter, Sort, SortDirection, StoreError, StoreResult, UNIQUE_FIELDS,
    compare_values,
};

/// In-process store. Collections keep insertion order.
#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_fields: Vec<(String, String)>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_unique_fields(UNIQUE_FIELDS)
    }

    pub fn with_unique_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            unique_fields: fields
                .iter()
                .map(|(collection, field)| (collection.to_string(), field.to_string()))
                .collect(),
        }
    }

    fn check_unique(
        &self,
        collection: &str,
        documents: &[Document],
        candidate: &Document,
        skip_id: Option<&str>,
    ) -> StoreResult<()> {
        for (_, field) in self
            .unique_fields
            .iter()
            .filter(|(name, _)| name == collection)
        {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = documents.iter().any(|existing| {
                existing.get(field) == Some(value)
                    && existing.get("id").and_then(Value::as_str) != skip_id
            });
            if taken {
                return Err(StoreError::Conflict {
                    collection: collection.to_string(),
                    detail: format!("{field} = {value}"),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(found)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };
        let mut matching = documents.iter().filter(|doc| filter.matches(doc));

        // max_by/min_by keep the last/first of equal keys, so ties resolve to
        // the latest insert for descending sorts and the earliest for ascending.
        let found = match sort {
            None => matching.next(),
            Some(sort) => {
                let by_field =
                    |a: &&Document, b: &&Document| compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Desc => matching.max_by(by_field),
                    SortDirection::Asc => matching.min_by(by_field),
                }
            }
        };
        Ok(found.cloned())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let id = Uuid::new_v4().to_string();
        document.insert("id".into(), Value::String(id.clone()));
        self.check_unique(collection, documents, &document, None)?;
        documents.push(document);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(position) = documents
            .iter()
            .position(|doc| doc.get("id").and_then(Value::as_str) == Some(id))
        else {
            return Ok(None);
        };

        let mut merged = documents[position].clone();
        for (key, value) in patch {
            if key != "id" {
                merged.insert(key, value);
            }
        }
        self.check_unique(collection, documents, &merged, Some(id))?;
        documents[position] = merged.clone();
        Ok(Some(merged))
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|doc| doc.get("id").and_then(Value::as_str) != Some(id));
        Ok(documents.len() != before)
    }
}
