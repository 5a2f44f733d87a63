// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use recrawl::domain::models::website_record::{WebsiteRecord, WebsiteRecordUpdate};
use recrawl::domain::repositories::record_repository::{RecordRepository, RepositoryError};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// 内存中的记录仓库
#[derive(Default)]
pub struct MemoryRecordRepository {
    records: Mutex<BTreeMap<String, WebsiteRecord>>,
}

impl MemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<WebsiteRecord>) -> Self {
        let repo = Self::new();
        for record in records {
            repo.insert(record);
        }
        repo
    }

    pub fn insert(&self, record: WebsiteRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &str) {
        self.records.lock().unwrap().remove(id);
    }
}

#[async_trait]
impl RecordRepository for MemoryRecordRepository {
    async fn get_record_ids(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.records.lock().unwrap().keys().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WebsiteRecord>, RepositoryError> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, record: &WebsiteRecord) -> Result<WebsiteRecord, RepositoryError> {
        self.insert(record.clone());
        Ok(record.clone())
    }

    async fn update(
        &self,
        id: &str,
        update: &WebsiteRecordUpdate,
    ) -> Result<Option<WebsiteRecord>, RepositoryError> {
        if update.is_empty() {
            return Err(RepositoryError::InvalidData("empty update".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        Ok(records.get_mut(id).map(|record| {
            update.apply_to(record);
            record.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.records.lock().unwrap().remove(id).is_some())
    }
}
