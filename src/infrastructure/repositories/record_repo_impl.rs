// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::website_record::{WebsiteRecord, WebsiteRecordUpdate};
use crate::domain::repositories::record_repository::{RecordRepository, RepositoryError};
use crate::infrastructure::database::entities::website_record as record_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// 网站记录仓库实现
///
/// 基于SeaORM实现的记录数据访问层
#[derive(Clone)]
pub struct RecordRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RecordRepositoryImpl {
    /// 创建新的记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<record_entity::Model> for WebsiteRecord {
    type Error = RepositoryError;

    fn try_from(model: record_entity::Model) -> Result<Self, Self::Error> {
        let tags: Vec<String> = serde_json::from_value(model.tags).map_err(|e| {
            RepositoryError::InvalidData(format!("tags of record {}: {}", model.id, e))
        })?;
        let periodicity_in_seconds = u64::try_from(model.periodicity_in_seconds).map_err(|_| {
            RepositoryError::InvalidData(format!(
                "negative periodicity {} on record {}",
                model.periodicity_in_seconds, model.id
            ))
        })?;

        Ok(Self {
            id: model.id,
            url: model.url,
            boundary_regex: model.boundary_regex,
            label: model.label,
            is_active: model.is_active,
            tags,
            periodicity_in_seconds,
            last_execution_id: model.last_execution_id,
        })
    }
}

fn periodicity_column(seconds: u64) -> Result<i64, RepositoryError> {
    i64::try_from(seconds)
        .map_err(|_| RepositoryError::InvalidData(format!("periodicity {} out of range", seconds)))
}

#[async_trait]
impl RecordRepository for RecordRepositoryImpl {
    async fn get_record_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let ids: Vec<String> = record_entity::Entity::find()
            .select_only()
            .column(record_entity::Column::Id)
            .order_by_asc(record_entity::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WebsiteRecord>, RepositoryError> {
        let model = record_entity::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?;

        model.map(WebsiteRecord::try_from).transpose()
    }

    async fn create(&self, record: &WebsiteRecord) -> Result<WebsiteRecord, RepositoryError> {
        let now = Utc::now();
        let model = record_entity::ActiveModel {
            id: Set(record.id.clone()),
            url: Set(record.url.clone()),
            boundary_regex: Set(record.boundary_regex.clone()),
            label: Set(record.label.clone()),
            is_active: Set(record.is_active),
            tags: Set(serde_json::Value::from(record.tags.clone())),
            periodicity_in_seconds: Set(periodicity_column(record.periodicity_in_seconds)?),
            last_execution_id: Set(record.last_execution_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        record_entity::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(record.clone())
    }

    async fn update(
        &self,
        id: &str,
        update: &WebsiteRecordUpdate,
    ) -> Result<Option<WebsiteRecord>, RepositoryError> {
        if update.is_empty() {
            return Err(RepositoryError::InvalidData(
                "update has no fields set".to_string(),
            ));
        }

        let Some(model) = record_entity::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let mut record = WebsiteRecord::try_from(model.clone())?;
        update.apply_to(&mut record);

        let mut active: record_entity::ActiveModel = model.into();
        if update.url.is_some() {
            active.url = Set(record.url.clone());
        }
        if update.boundary_regex.is_some() {
            active.boundary_regex = Set(record.boundary_regex.clone());
        }
        if update.label.is_some() {
            active.label = Set(record.label.clone());
        }
        if update.is_active.is_some() {
            active.is_active = Set(record.is_active);
        }
        if update.tags.is_some() {
            active.tags = Set(serde_json::Value::from(record.tags.clone()));
        }
        if update.periodicity_in_seconds.is_some() {
            active.periodicity_in_seconds = Set(periodicity_column(record.periodicity_in_seconds)?);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(self.db.as_ref()).await?;
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = record_entity::Entity::delete_by_id(id.to_string())
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
