//! Query rendering and evaluation against the in-memory backend.

use serde::{Deserialize, Serialize};
use serde_json::json;

use searchlayer::memory::InMemoryStore;
use searchlayer::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    id: i64,
    text: String,
}

impl Document for Article {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn index_name() -> &'static str {
        "articles"
    }
}

async fn seed(index: &IndexHandle<'_, InMemoryStore>) {
    let docs = [
        json!({
            "id": 10,
            "type": "news",
            "text": "severe storm warning issued",
            "hasVideo": true,
            "projects": [{ "id": 3 }],
            "tags": [{ "id": 101 }],
        }),
        json!({
            "id": 20,
            "type": "article",
            "text": "quiet sunny day on the coast",
            "hasVideo": false,
            "projects": [{ "id": 4 }],
            "tags": [{ "id": 101 }, { "id": 102 }],
        }),
        json!({
            "id": 30,
            "type": "news",
            "text": "flood waters rising after the storm",
            "hasVideo": true,
            "projects": [{ "id": 3 }, { "id": 5 }],
            "tags": [{ "id": 103 }],
        }),
    ];
    for doc in docs {
        let id = doc["id"].to_string();
        index.create(&id, doc).await.unwrap();
    }
}

fn hit_ids(response: &SearchResponse) -> Vec<String> {
    response.hits.hits.iter().map(|hit| hit.id.clone()).collect()
}

#[tokio::test]
async fn an_unbounded_query_matches_nothing() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    // The mandatory id window renders with zero bounds, and id > 0 && id < 0
    // holds for no document.
    let response = index.search_response(&SearchQuery::new()).await.unwrap();
    assert_eq!(response.hits.total.value, 0);
    assert!(response.hits.hits.is_empty());
}

#[tokio::test]
async fn the_id_window_bounds_are_exclusive() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(5, 25))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["10", "20"]);

    let response = index
        .search_response(&SearchQuery::new().id_range(10, 30))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["20"]);
}

#[tokio::test]
async fn the_exclusion_window_drops_matching_ids() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(5, 35).exclude_id_range(15, 25))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["10", "30"]);
}

#[tokio::test]
async fn membership_reaches_through_nested_ids() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).projects(vec![3]))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["10", "30"]);

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).tags(vec![102, 103]))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["20", "30"]);
}

#[tokio::test]
async fn flag_and_type_filters_restrict_hits() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).has_video(true))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["10", "30"]);

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).doc_type("article"))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["20"]);
}

#[tokio::test]
async fn word_search_matches_any_of_the_words() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).words("storm sunshine"))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["10", "30"]);
}

#[tokio::test]
async fn phrase_search_requires_the_exact_sequence() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).phrase("sunny day"))
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["20"]);

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).phrase("day sunny"))
        .await
        .unwrap();
    assert!(response.hits.hits.is_empty());
}

#[tokio::test]
async fn words_take_precedence_over_phrase() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    seed(&index).await;

    let response = index
        .search_response(
            &SearchQuery::new()
                .id_range(0, 100)
                .words("sunny")
                .phrase("storm warning"),
        )
        .await
        .unwrap();
    assert_eq!(hit_ids(&response), ["20"]);
}

#[tokio::test]
async fn size_caps_hits_but_not_the_total() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");
    for id in 1..=5 {
        index
            .create(&id.to_string(), json!({ "id": id }))
            .await
            .unwrap();
    }

    let response = index
        .search_response(&SearchQuery::new().id_range(0, 100).size(2))
        .await
        .unwrap();
    assert_eq!(response.hits.total.value, 5);
    assert_eq!(response.hits.hits.len(), 2);
}

#[tokio::test]
async fn typed_search_decodes_hit_sources() {
    let store = SearchStore::new(InMemoryStore::new());
    seed(&store.index("articles")).await;

    let articles = store.typed_index::<Article>();
    let found = articles
        .search(&SearchQuery::new().id_range(0, 100).words("storm"))
        .await
        .unwrap();

    let ids: Vec<i64> = found.iter().map(|article| article.id).collect();
    assert_eq!(ids, [10, 30]);
    assert_eq!(found[0].text, "severe storm warning issued");
}

#[tokio::test]
async fn an_empty_membership_set_fails_before_the_backend() {
    let store = SearchStore::new(InMemoryStore::new());
    let index = store.index("articles");

    let err = index
        .search(&SearchQuery::new().id_range(0, 100).tags(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchStoreError::InvalidQuery(_)));
}

#[tokio::test]
async fn searching_an_absent_index_finds_nothing() {
    let store = SearchStore::new(InMemoryStore::new());

    let response = store
        .index("nowhere")
        .search_response(&SearchQuery::new().id_range(0, 100))
        .await
        .unwrap();
    assert_eq!(response.hits.total.value, 0);
    assert!(response.hits.hits.is_empty());
}
