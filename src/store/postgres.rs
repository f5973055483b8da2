use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Select, Set, SqlErr,
    sea_query::{Expr, SimpleExpr},
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{Condition, Document, DocumentStore, Filter, Sort, SortDirection, StoreError, StoreResult};
use crate::entity::documents::{ActiveModel, Column, Entity as Documents, Model};

/// Documents live in a single `documents` table as JSONB, partitioned by the
/// `collection` column. Unique fields are enforced by partial indexes (see
/// `migrations/`).
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    conn: DatabaseConnection,
}

impl PgDocumentStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Builds the select for a collection, or `None` when the filter can never
    /// match (an `id` condition that is not a UUID).
    fn select(collection: &str, filter: &Filter) -> Option<Select<Documents>> {
        let mut select = Documents::find().filter(Column::Collection.eq(collection));
        for condition in filter.conditions() {
            select = match condition {
                Condition::Eq(field, value) if field == "id" => {
                    let id = value.as_str().and_then(|raw| Uuid::parse_str(raw).ok())?;
                    select.filter(Column::Id.eq(id))
                }
                Condition::In(field, values) if field == "id" => {
                    let ids: Vec<Uuid> = values
                        .iter()
                        .filter_map(|value| value.as_str().and_then(|raw| Uuid::parse_str(raw).ok()))
                        .collect();
                    select.filter(Column::Id.is_in(ids))
                }
                Condition::Eq(field, value) => select.filter(contains_expr(json!({ field: value }))),
                Condition::Contains(field, value) => {
                    select.filter(contains_expr(json!({ field: [value] })))
                }
                Condition::In(field, values) => select.filter(Expr::cust_with_values(
                    "? @> (body -> ?)",
                    [
                        sea_orm::Value::from(Value::Array(values.clone())),
                        sea_orm::Value::from(field.clone()),
                    ],
                )),
            };
        }
        Some(select)
    }
}

fn contains_expr(fragment: Value) -> SimpleExpr {
    Expr::cust_with_values("body @> ?", [fragment])
}

fn into_document(model: Model) -> Document {
    let mut document = match model.body {
        Value::Object(map) => map,
        _ => Document::new(),
    };
    document.insert("id".into(), Value::String(model.id.to_string()));
    document
}

fn map_db_err(collection: &str, err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict {
            collection: collection.to_string(),
            detail,
        },
        _ => StoreError::Orm(err),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let Some(select) = Self::select(collection, filter) else {
            return Ok(Vec::new());
        };
        let rows = select
            .order_by_asc(Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Document>> {
        let Some(mut select) = Self::select(collection, filter) else {
            return Ok(None);
        };
        select = match sort {
            Some(sort) => {
                let order = match sort.direction {
                    SortDirection::Asc => Order::Asc,
                    SortDirection::Desc => Order::Desc,
                };
                select
                    .order_by(
                        Expr::cust_with_values("body -> ?", [sort.field.clone()]),
                        order.clone(),
                    )
                    .order_by(Column::CreatedAt, order)
            }
            None => select.order_by_asc(Column::CreatedAt),
        };
        let row = select.one(&self.conn).await?;
        Ok(row.map(into_document))
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        document.remove("id");
        let id = Uuid::new_v4();
        let active = ActiveModel {
            id: Set(id),
            collection: Set(collection.to_string()),
            body: Set(Value::Object(document)),
            created_at: Set(Utc::now().into()),
        };
        active
            .insert(&self.conn)
            .await
            .map_err(|err| map_db_err(collection, err))?;
        Ok(id.to_string())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let existing = Documents::find_by_id(id)
            .filter(Column::Collection.eq(collection))
            .one(&self.conn)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut body = into_document(existing.clone());
        body.remove("id");
        for (key, value) in patch {
            if key != "id" {
                body.insert(key, value);
            }
        }

        let mut active: ActiveModel = existing.into();
        active.body = Set(Value::Object(body));
        let updated = active
            .update(&self.conn)
            .await
            .map_err(|err| map_db_err(collection, err))?;
        Ok(Some(into_document(updated)))
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };
        let result = Documents::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Collection.eq(collection))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
