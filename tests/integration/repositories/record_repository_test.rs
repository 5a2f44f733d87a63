// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{record, setup_db};
use recrawl::domain::models::website_record::WebsiteRecordUpdate;
use recrawl::domain::repositories::record_repository::{RecordRepository, RepositoryError};
use recrawl::infrastructure::repositories::record_repo_impl::RecordRepositoryImpl;

#[tokio::test]
async fn test_create_and_find_record() {
    let repo = RecordRepositoryImpl::new(setup_db().await);
    let mut created = record("r1", 3600, true);
    created.tags = vec!["news".to_string(), "daily".to_string()];
    repo.create(&created).await.unwrap();

    let found = repo.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_record_ids() {
    let repo = RecordRepositoryImpl::new(setup_db().await);
    for id in ["b", "a", "c"] {
        repo.create(&record(id, 0, true)).await.unwrap();
    }

    let ids = repo.get_record_ids().await.unwrap();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

/// 只更新设置了值的字段
#[tokio::test]
async fn test_update_changes_only_set_fields() {
    let repo = RecordRepositoryImpl::new(setup_db().await);
    repo.create(&record("r1", 60, true)).await.unwrap();

    let update = WebsiteRecordUpdate {
        is_active: Some(false),
        periodicity_in_seconds: Some(120),
        tags: Some(vec!["paused".to_string()]),
        ..Default::default()
    };
    let updated = repo.update("r1", &update).await.unwrap().unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.periodicity_in_seconds, 120);
    assert_eq!(updated.url, "https://r1.example.com");

    let stored = repo.find_by_id("r1").await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_update_edge_cases() {
    let repo = RecordRepositoryImpl::new(setup_db().await);
    repo.create(&record("r1", 60, true)).await.unwrap();

    let empty = repo.update("r1", &WebsiteRecordUpdate::default()).await;
    assert!(matches!(empty, Err(RepositoryError::InvalidData(_))));

    let update = WebsiteRecordUpdate {
        label: Some("renamed".to_string()),
        ..Default::default()
    };
    assert!(repo.update("missing", &update).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_record() {
    let repo = RecordRepositoryImpl::new(setup_db().await);
    repo.create(&record("r1", 0, true)).await.unwrap();

    assert!(repo.delete("r1").await.unwrap());
    assert!(!repo.delete("r1").await.unwrap());
    assert!(repo.find_by_id("r1").await.unwrap().is_none());
}
