use food_truck_api::store::{
    Document, DocumentStore, Filter, MemoryStore, Sort, StoreError, ORDERS, OPTIONS,
};
use serde_json::{Value, json};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[tokio::test]
async fn insert_assigns_id_and_ignores_supplied_one() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = store
        .insert(OPTIONS, doc(json!({ "id": "mine", "name": "Bacon", "price": "2.00" })))
        .await?;
    assert_ne!(id, "mine");

    let found = store
        .find_one(OPTIONS, &Filter::by_id(&id), None)
        .await?
        .expect("inserted document");
    assert_eq!(found.get("name"), Some(&json!("Bacon")));
    assert!(store.find_one(OPTIONS, &Filter::by_id("mine"), None).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unique_fields_reject_duplicates_on_insert_and_update() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.insert(OPTIONS, doc(json!({ "name": "Bacon" }))).await?;
    let cheese = store.insert(OPTIONS, doc(json!({ "name": "Cheese" }))).await?;

    let duplicate = store.insert(OPTIONS, doc(json!({ "name": "Bacon" }))).await;
    assert!(matches!(duplicate, Err(StoreError::Conflict { .. })));

    let rename = store
        .update(OPTIONS, &cheese, doc(json!({ "name": "Bacon" })))
        .await;
    assert!(matches!(rename, Err(StoreError::Conflict { .. })));

    // Rewriting a document with its own value is not a clash.
    let same = store
        .update(OPTIONS, &cheese, doc(json!({ "name": "Cheese", "price": "1.00" })))
        .await?;
    assert_eq!(same.and_then(|d| d.get("price").cloned()), Some(json!("1.00")));
    Ok(())
}

#[tokio::test]
async fn filters_match_eq_in_and_contains() -> anyhow::Result<()> {
    let store = MemoryStore::with_unique_fields(&[]);
    store
        .insert("menu", doc(json!({ "name": "Burger", "available": true, "options": ["Bacon"] })))
        .await?;
    store
        .insert("menu", doc(json!({ "name": "Wrap", "available": false, "options": [] })))
        .await?;

    let available = store.find("menu", &Filter::all().eq("available", true)).await?;
    assert_eq!(available.len(), 1);

    let named = store
        .find("menu", &Filter::all().any_of("name", ["Wrap", "Taco"]))
        .await?;
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].get("name"), Some(&json!("Wrap")));

    let with_bacon = store
        .find("menu", &Filter::all().contains("options", "Bacon"))
        .await?;
    assert_eq!(with_bacon.len(), 1);
    assert_eq!(with_bacon[0].get("name"), Some(&json!("Burger")));

    assert_eq!(store.find("menu", &Filter::all()).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn find_one_sorts_numbers_numerically() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    for sequence in [9_999_u64, 10_000, 2] {
        store
            .insert(
                ORDERS,
                doc(json!({
                    "order_number": format!("FT-2025-{sequence:04}"),
                    "year": 2025,
                    "sequence": sequence,
                })),
            )
            .await?;
    }

    let latest = store
        .find_one(ORDERS, &Filter::all().eq("year", 2025), Some(&Sort::desc("sequence")))
        .await?
        .expect("an order");
    assert_eq!(latest.get("sequence"), Some(&json!(10_000)));

    let first = store
        .find_one(ORDERS, &Filter::all(), Some(&Sort::asc("sequence")))
        .await?
        .expect("an order");
    assert_eq!(first.get("sequence"), Some(&json!(2)));
    Ok(())
}

#[tokio::test]
async fn descending_ties_resolve_to_latest_insert() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .insert("carts", doc(json!({ "owner": "a", "created_at": "2025-01-01T00:00:00.000000Z" })))
        .await?;
    let second = store
        .insert("carts", doc(json!({ "owner": "a", "created_at": "2025-01-01T00:00:00.000000Z" })))
        .await?;

    let active = store
        .find_one("carts", &Filter::all().eq("owner", "a"), Some(&Sort::desc("created_at")))
        .await?
        .expect("a cart");
    assert_eq!(active.get("id"), Some(&json!(second)));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_report_missing_documents() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    assert!(store.update(OPTIONS, "nope", Document::new()).await?.is_none());
    assert!(!store.delete(OPTIONS, "nope").await?);

    let id = store.insert(OPTIONS, doc(json!({ "name": "Bacon" }))).await?;
    assert!(store.delete(OPTIONS, &id).await?);
    assert!(!store.delete(OPTIONS, &id).await?);
    Ok(())
}
