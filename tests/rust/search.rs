use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use catalog_search::core::errors::CoreError;
use catalog_search::core::reindex_pipeline::ReindexPipeline;
use catalog_search::core::search_pipeline::{build_work_query, SearchPipeline, TAGS_BOOST, TITLE_BOOST};
use catalog_search::index::memory_search::MemorySearchBackend;
use catalog_search::index::names::WORK_INDEX;
use catalog_search::index::search_backend::{IndexDocument, SearchBackend};

use crate::support::{sample_catalog, FlakySearchBackend, MemoryCatalogStore};

async fn indexed(store: Arc<MemoryCatalogStore>) -> Arc<FlakySearchBackend> {
    let backend = Arc::new(FlakySearchBackend::new());
    ReindexPipeline::new(store, backend.clone())
        .reindex(&CancellationToken::new())
        .await
        .unwrap();
    backend
}

#[test]
fn query_lowercases_and_wraps_term() {
    let query = build_work_query("  AtLaS ", 10).unwrap();

    assert_eq!(query.should.len(), 3);
    assert!(query.should.iter().all(|clause| clause.pattern == "*atlas*"));
    assert_eq!(query.should[0].field, "title");
    assert_eq!(query.should[0].boost, Some(TITLE_BOOST));
    assert_eq!(query.should[1].field, "tags");
    assert_eq!(query.should[1].boost, Some(TAGS_BOOST));
    assert_eq!(query.should[2].field, "description");
    assert_eq!(query.should[2].boost, None);
    assert!(query.should.iter().all(|clause| !clause.field.contains("contributors")));
}

#[test]
fn query_body_is_a_scored_should_clause() {
    let body = build_work_query("atlas", 7).unwrap().to_request_body();

    assert_eq!(body["size"], 7);
    assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
    assert_eq!(
        body["query"]["bool"]["should"][0],
        json!({ "wildcard": { "title": { "value": "*atlas*", "boost": 3.0 } } })
    );
    assert_eq!(
        body["query"]["bool"]["should"][2],
        json!({ "wildcard": { "description": { "value": "*atlas*" } } })
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
#[tokio::test]
async fn blank_term_never_reaches_backend(#[case] term: &str) {
    let backend = Arc::new(FlakySearchBackend::new());
    let pipeline = SearchPipeline::new(backend.clone(), 10);

    let results = pipeline.search(term, &CancellationToken::new()).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(backend.search_calls(), 0);
}

#[tokio::test]
async fn title_match_ranks_above_description_match() {
    let store = Arc::new(MemoryCatalogStore::new());
    let described = store.add_work("Road Maps", Some("A world atlas of roads"), &[]);
    let titled = store.add_work("Atlas Shrugged", None, &[]);
    let backend = indexed(store).await;

    let results = SearchPipeline::new(backend, 10)
        .search("atlas", &CancellationToken::new())
        .await
        .unwrap();

    let ids = results.iter().map(|result| result.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![titled, described]);
}

#[tokio::test]
async fn tag_match_ranks_between_title_and_description() {
    let store = Arc::new(MemoryCatalogStore::new());
    let described = store.add_work("Plain", Some("mentions dune"), &[]);
    let tagged = store.add_work("Other", None, &["dunes"]);
    let titled = store.add_work("Dune", None, &[]);
    let backend = indexed(store).await;

    let results = SearchPipeline::new(backend, 10)
        .search("DUNE", &CancellationToken::new())
        .await
        .unwrap();

    let ids = results.iter().map(|result| result.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![titled, tagged, described]);
}

#[tokio::test]
async fn contributor_name_alone_does_not_match() {
    let sample = sample_catalog();
    let backend = indexed(sample.store.clone()).await;
    let pipeline = SearchPipeline::new(backend.clone(), 10);

    let ellison = pipeline.search("ellison", &CancellationToken::new()).await.unwrap();
    let shadow = pipeline.search("shadow", &CancellationToken::new()).await.unwrap();

    assert!(ellison.is_empty());
    assert_eq!(shadow.len(), 1);
    assert_eq!(shadow[0].id, sample.shadow);
    assert_eq!(backend.search_calls(), 2);
}

#[tokio::test]
async fn results_carry_contributor_references() {
    let sample = sample_catalog();
    let backend = indexed(sample.store.clone()).await;

    let results = SearchPipeline::new(backend, 10)
        .search("cloud", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, sample.atlas);
    assert_eq!(results[0].tags, vec!["novel", "literary", "novel"]);
    assert_eq!(results[0].contributors.len(), 2);
}

#[tokio::test]
async fn hits_with_null_tags_map_to_empty_list() {
    let backend = Arc::new(MemorySearchBackend::new());
    backend.create_index(WORK_INDEX, &json!({})).await.unwrap();
    let id = uuid::Uuid::new_v4();
    backend
        .bulk_upsert(
            WORK_INDEX,
            vec![IndexDocument {
                id: id.to_string(),
                body: json!({ "title": "Legacy Entry", "tags": null }),
            }],
        )
        .await
        .unwrap();

    let results = SearchPipeline::new(backend, 10)
        .search("legacy", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, id);
    assert!(results[0].tags.is_empty());
    assert!(results[0].contributors.is_empty());
    assert_eq!(results[0].description, None);
}

#[tokio::test]
async fn max_hits_bounds_result_count() {
    let store = Arc::new(MemoryCatalogStore::new());
    for index in 0..5 {
        store.add_work(&format!("Saga part {}", index), None, &[]);
    }
    let backend = indexed(store).await;

    let results = SearchPipeline::new(backend, 2)
        .search("saga", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn missing_index_surfaces_search_error() {
    let backend = Arc::new(MemorySearchBackend::new());

    let error = SearchPipeline::new(backend, 10)
        .search("anything", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(error, CoreError::Search(_)));
}
