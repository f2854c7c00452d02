//! End-to-end document operations against the in-memory backend.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use searchlayer::memory::InMemoryStore;
use searchlayer::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    id: i64,
    text: String,
    #[serde(default)]
    tags: Vec<i64>,
}

impl Document for Article {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_name() -> &'static str {
        "articles"
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

#[tokio::test]
async fn create_read_delete_round_trip() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    let ack = index
        .create(&id, json!({ "id": 7, "text": "first" }))
        .await
        .unwrap();
    assert_eq!(ack.result, OpResult::Created);
    assert_eq!(ack.version, 1);
    assert!(index.exists(&id).await.unwrap());

    let got = index.read(&id).await.unwrap();
    assert_eq!(got.source, json!({ "id": 7, "text": "first" }));

    let raw = index.source(&id).await.unwrap();
    let source: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(source, got.source);

    let ack = index.delete(&id).await.unwrap();
    assert_eq!(ack.result, OpResult::Deleted);
    assert!(!index.exists(&id).await.unwrap());

    let err = index.read(&id).await.unwrap_err();
    assert!(matches!(err, SearchStoreError::Backend { status: 404, .. }));
}

#[tokio::test]
async fn empty_create_body_stores_an_id_document() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({})).await.unwrap();

    let got = index.read(&id).await.unwrap();
    assert_eq!(got.source, json!({ "id": id }));
}

#[tokio::test]
async fn overwriting_a_document_bumps_its_version() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({ "id": 1 })).await.unwrap();
    let ack = index.create(&id, json!({ "id": 2 })).await.unwrap();

    assert_eq!(ack.result, OpResult::Updated);
    assert_eq!(ack.version, 2);
    assert_eq!(index.read(&id).await.unwrap().source, json!({ "id": 2 }));
}

#[tokio::test]
async fn partial_update_touches_only_named_fields() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index
        .create(&id, json!({ "id": 1, "text": "old", "views": 4 }))
        .await
        .unwrap();

    let ack = index.update(&id, json!({ "text": "new" })).await.unwrap();
    assert_eq!(ack.result, OpResult::Updated);
    assert_eq!(ack.version, 2);

    let got = index.read(&id).await.unwrap();
    assert_eq!(got.source, json!({ "id": 1, "text": "new", "views": 4 }));
}

#[tokio::test]
async fn identical_update_is_a_noop() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({ "id": 1, "text": "same" })).await.unwrap();
    index.update(&id, json!({ "text": "changed" })).await.unwrap();

    let ack = index.update(&id, json!({ "text": "changed" })).await.unwrap();
    assert_eq!(ack.result, OpResult::Noop);
    assert_eq!(ack.version, 2);
}

#[tokio::test]
async fn updating_a_missing_document_is_a_backend_404() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");

    let err = index
        .update(&fresh_id(), json!({ "text": "x" }))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchStoreError::Backend { status: 404, .. }));
}

#[tokio::test]
async fn blank_targets_fail_before_reaching_the_backend() {
    let store = SearchStore::new(InMemoryStore::new());

    let err = store
        .index("")
        .create("a-1", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchStoreError::InvalidRequest(_)));

    let err = store
        .index("articles")
        .create("", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchStoreError::InvalidRequest(_)));
}

#[tokio::test]
async fn append_creates_the_array_when_the_field_is_missing() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({ "id": 1 })).await.unwrap();

    let item = json!({ "article_id": 1886671, "position": 3 });
    let ack = index
        .insert_array_item(&id, "mask_articles", &item)
        .await
        .unwrap();
    assert_eq!(ack.result, OpResult::Updated);

    let got = index.read(&id).await.unwrap();
    assert_eq!(got.source["mask_articles"], json!([item]));
}

#[tokio::test]
async fn append_keeps_existing_elements_in_order() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index
        .create(
            &id,
            json!({
                "id": 1,
                "mask_articles": [
                    { "article_id": 1886671, "position": 3 },
                    { "article_id": 1886746, "position": 1 },
                ],
            }),
        )
        .await
        .unwrap();

    index
        .insert_array_item(&id, "mask_articles", &json!({ "article_id": 7, "position": 2 }))
        .await
        .unwrap();

    let got = index.read(&id).await.unwrap();
    assert_eq!(
        got.source["mask_articles"],
        json!([
            { "article_id": 1886671, "position": 3 },
            { "article_id": 1886746, "position": 1 },
            { "article_id": 7, "position": 2 },
        ])
    );
}

#[tokio::test]
async fn replace_swaps_the_first_matching_element_only() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index
        .create(
            &id,
            json!({
                "id": 1,
                "mask_articles": [
                    { "article_id": 1886671, "position": 3 },
                    { "article_id": 1886746, "position": 1 },
                ],
            }),
        )
        .await
        .unwrap();

    index
        .update_array_item(
            &id,
            "mask_articles",
            "article_id",
            1886671,
            &json!({ "article_id": 1886671, "position": 9 }),
        )
        .await
        .unwrap();

    let got = index.read(&id).await.unwrap();
    assert_eq!(
        got.source["mask_articles"],
        json!([
            { "article_id": 1886671, "position": 9 },
            { "article_id": 1886746, "position": 1 },
        ])
    );
}

#[tokio::test]
async fn replace_without_a_match_leaves_the_source_untouched() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index
        .create(
            &id,
            json!({
                "id": 1,
                "mask_articles": [{ "article_id": 1886746, "position": 1 }],
            }),
        )
        .await
        .unwrap();
    let before = index.read(&id).await.unwrap().source;

    index
        .update_array_item(
            &id,
            "mask_articles",
            "article_id",
            999,
            &json!({ "article_id": 999, "position": 5 }),
        )
        .await
        .unwrap();

    assert_eq!(index.read(&id).await.unwrap().source, before);
}

#[tokio::test]
async fn remove_deletes_every_matching_element() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index
        .create(
            &id,
            json!({
                "id": 1,
                "mask_articles": [
                    { "article_id": 7, "position": 1 },
                    { "article_id": 8, "position": 2 },
                    { "article_id": 7, "position": 3 },
                ],
            }),
        )
        .await
        .unwrap();

    index
        .remove_array_item(&id, "mask_articles", "article_id", 7)
        .await
        .unwrap();

    let got = index.read(&id).await.unwrap();
    assert_eq!(
        got.source["mask_articles"],
        json!([{ "article_id": 8, "position": 2 }])
    );
}

#[tokio::test]
async fn hostile_array_names_are_rejected_before_reaching_the_backend() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({ "id": 1 })).await.unwrap();

    let err = index
        .insert_array_item(&id, "tags; ctx._source.id = 0", &json!(1))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchStoreError::InvalidScript(_)));
}

#[tokio::test]
async fn typed_handles_round_trip_documents() {
    let store = SearchStore::new(InMemoryStore::new());
    let articles = store.typed_index::<Article>();

    let article = Article {
        id: 42,
        text: "typed round trip".to_string(),
        tags: vec![3, 4],
    };

    let ack = articles.create(&article).await.unwrap();
    assert_eq!(ack.id, "42");
    assert_eq!(articles.read("42").await.unwrap(), article);

    articles.delete("42").await.unwrap();
    assert!(!articles.exists("42").await.unwrap());
}

#[tokio::test]
async fn dynamic_stores_expose_the_same_operations() {
    let store = SearchStore::new(InMemoryStore::new()).into_dyn();
    let index = store.index("articles");
    let id = fresh_id();

    index.create(&id, json!({ "id": 5 })).await.unwrap();
    assert!(index.exists(&id).await.unwrap());

    let typed = store.typed_index::<Article>();
    let article = Article { id: 6, text: "dyn".to_string(), tags: vec![] };
    typed.create(&article).await.unwrap();
    assert_eq!(typed.read("6").await.unwrap(), article);

    // The concrete backend is still reachable behind the trait object.
    let static_store = store.as_static::<InMemoryStore>().unwrap();
    assert!(static_store.index("articles").exists(&id).await.unwrap());
}
