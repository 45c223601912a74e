use rstest::rstest;
use std::sync::Arc;
use uuid::Uuid;

use catalog_search::core::catalog_pipeline::CatalogPipeline;
use catalog_search::core::errors::CoreError;
use catalog_search::core::models::{NewContributor, NewWork};
use catalog_search::index::catalog_store::CatalogStore;

use crate::support::{sample_catalog, MemoryCatalogStore};

fn new_work(title: &str, contributor_ids: Vec<Uuid>) -> NewWork {
    NewWork {
        title: title.to_string(),
        description: Some("desc".to_string()),
        tags: vec!["x".to_string(), "x".to_string()],
        contributor_ids,
    }
}

#[tokio::test]
async fn created_work_is_linked_to_contributors() {
    let sample = sample_catalog();
    let pipeline = CatalogPipeline::new(sample.store.clone());

    let created = pipeline
        .create_work(new_work("  Ghostwritten ", vec![sample.mitchell, sample.mitchell]))
        .await
        .unwrap();

    assert_eq!(created.title, "Ghostwritten");
    assert_eq!(created.tags, vec!["x", "x"]);
    let works = sample.store.load_works().await.unwrap();
    let stored = works.iter().find(|w| w.work.id == created.id).unwrap();
    assert_eq!(stored.contributors.len(), 1);
    assert_eq!(stored.contributors[0].id, sample.mitchell);
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_title_is_rejected(#[case] title: &str) {
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = CatalogPipeline::new(store.clone());

    let error = pipeline.create_work(new_work(title, Vec::new())).await.unwrap_err();

    assert!(matches!(error, CoreError::InvalidInput(_)));
    assert!(store.load_works().await.unwrap().is_empty());
}

#[tokio::test]
async fn bulk_requests_must_not_be_empty() {
    let pipeline = CatalogPipeline::new(Arc::new(MemoryCatalogStore::new()));

    let works = pipeline.create_works(Vec::new()).await.unwrap_err();
    let contributors = pipeline.create_contributors(Vec::new()).await.unwrap_err();

    assert!(matches!(works, CoreError::InvalidInput(_)));
    assert!(matches!(contributors, CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn bulk_with_one_invalid_entry_inserts_nothing() {
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = CatalogPipeline::new(store.clone());

    let error = pipeline
        .create_works(vec![new_work("Valid", Vec::new()), new_work(" ", Vec::new())])
        .await
        .unwrap_err();

    assert!(matches!(error, CoreError::InvalidInput(_)));
    assert!(store.load_works().await.unwrap().is_empty());
}

#[tokio::test]
async fn contributors_are_created_and_listed() {
    let store = Arc::new(MemoryCatalogStore::new());
    let pipeline = CatalogPipeline::new(store.clone());

    let created = pipeline
        .create_contributors(vec![
            NewContributor { name: "Iain Banks".to_string(), tags: vec!["culture".to_string()] },
            NewContributor { name: "Ann Leckie".to_string(), tags: Vec::new() },
        ])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_ne!(created[0].id, created[1].id);

    let blank = pipeline
        .create_contributor(NewContributor { name: " ".to_string(), tags: Vec::new() })
        .await
        .unwrap_err();
    assert!(matches!(blank, CoreError::InvalidInput(_)));

    let listed = pipeline.list_contributors(false).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn contributor_listing_optionally_includes_works() {
    let sample = sample_catalog();
    let pipeline = CatalogPipeline::new(sample.store.clone());

    let plain = pipeline.list_contributors(false).await.unwrap();
    let with_works = pipeline.list_contributors(true).await.unwrap();

    assert_eq!(sample.store.contributor_loads(), 2);
    assert!(plain.iter().all(|contributor| contributor.works.is_empty()));
    let ellison = with_works.iter().find(|c| c.id == sample.ellison).unwrap();
    assert_eq!(ellison.works.len(), 2);
}

#[tokio::test]
async fn works_without_contributors_strips_references() {
    let sample = sample_catalog();
    let pipeline = CatalogPipeline::new(sample.store.clone());

    let works = pipeline.list_works_without_contributors().await.unwrap();

    assert_eq!(works.len(), 3);
    assert!(works.iter().all(|work| work.contributors.is_empty()));
}

#[tokio::test]
async fn unknown_contributor_id_is_invalid_input() {
    let sample = sample_catalog();
    let pipeline = CatalogPipeline::new(sample.store.clone());

    let error = pipeline
        .create_work(new_work("Dangling", vec![Uuid::new_v4()]))
        .await
        .unwrap_err();

    assert!(matches!(error, CoreError::InvalidInput(_)));
}
